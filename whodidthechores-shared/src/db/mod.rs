/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: embedded schema migrations
///
/// Entity queries live in [`crate::models`]; the transactional gateway over
/// them is [`crate::repository::Repository`].

pub mod migrations;
pub mod pool;
