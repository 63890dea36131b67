pub mod credentials;

pub use credentials::PostgresCredentialRepository;
