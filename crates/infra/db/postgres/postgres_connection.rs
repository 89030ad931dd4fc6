use anyhow::Result;
use diesel::{
    Connection, PgConnection,
    connection::CacheSize,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};

pub type PgPoolArena = Pool<ConnectionManager<PgConnection>>;

/// The hosted pooler (Supavisor transaction mode) rejects server-side
/// prepared statements, so the cache is switched off on every checkout.
#[derive(Debug)]
struct PoolerCompat;

impl CustomizeConnection<PgConnection, R2d2Error> for PoolerCompat {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

pub fn establish_connection(database_url: &str) -> Result<PgPoolArena> {
    let pool = Pool::builder()
        .connection_customizer(Box::new(PoolerCompat))
        .build(ConnectionManager::<PgConnection>::new(database_url))?;
    Ok(pool)
}
