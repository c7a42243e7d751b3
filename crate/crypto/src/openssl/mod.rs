mod hashing;
mod provider;

pub use hashing::hashing_algorithm_to_openssl;
pub use provider::OpensslProvider;
