// Service exports
pub mod cache;
pub mod directory;
pub mod location;
pub mod memory;
pub mod remote;

pub use cache::{CacheKey, CachedDirectory};
pub use directory::{DirectoryError, DirectoryQuery, ProviderDirectory};
pub use location::{LocationError, LocationProvider, StaticLocationProvider};
pub use memory::{sample_catalog, InMemoryDirectory};
pub use remote::RemoteDirectory;
