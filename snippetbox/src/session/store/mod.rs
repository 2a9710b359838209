mod memory;
mod redis;
mod types;

pub use memory::MemorySessionStore;
pub use self::redis::RedisSessionStore;
pub use types::SessionStore;
