//! Redis-backed session store

mod session;

pub use session::RedisSessionStore;
