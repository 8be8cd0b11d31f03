use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::info;
use uuid::Uuid;

use usher_core::repository::{SeatMap, StoreError};

fn backend(err: redis::RedisError) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Redis-backed seat map. Each show keeps one hash `show:{id}:seats`
/// mapping seat label to owning user. Claims and conditional releases run
/// as Lua scripts, which Redis executes atomically, so the conditional
/// write needs no client-side locking; coordination is naturally per show
/// because every script touches a single show's hash.
#[derive(Clone)]
pub struct RedisSeatMap {
    client: redis::Client,
}

impl RedisSeatMap {
    pub fn new(connection_string: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_string).map_err(backend)?;
        Ok(Self { client })
    }

    fn seats_key(show_id: Uuid) -> String {
        format!("show:{}:seats", show_id)
    }
}

#[async_trait]
impl SeatMap for RedisSeatMap {
    async fn claim_seats(
        &self,
        show_id: Uuid,
        user_id: &str,
        seats: &[String],
    ) -> Result<bool, StoreError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend)?;

        // ARGV[1] is the user, the rest are seat labels. Refuse the whole
        // claim if any requested seat already has an owner.
        let script = redis::Script::new(
            r#"
            for i = 2, #ARGV do
                if redis.call("HEXISTS", KEYS[1], ARGV[i]) == 1 then
                    return 0
                end
            end
            for i = 2, #ARGV do
                redis.call("HSET", KEYS[1], ARGV[i], ARGV[1])
            end
            return 1
        "#,
        );

        let claimed: i64 = script
            .key(Self::seats_key(show_id))
            .arg(user_id)
            .arg(seats)
            .invoke_async(&mut conn)
            .await
            .map_err(backend)?;

        if claimed == 1 {
            info!(
                "claimed {} seat(s) on show {} for {}",
                seats.len(),
                show_id,
                user_id
            );
        }
        Ok(claimed == 1)
    }

    async fn release_seat_if_owner(
        &self,
        show_id: Uuid,
        seat: &str,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend)?;

        let script = redis::Script::new(
            r#"
            if redis.call("HGET", KEYS[1], ARGV[2]) == ARGV[1] then
                return redis.call("HDEL", KEYS[1], ARGV[2])
            end
            return 0
        "#,
        );

        let removed: i64 = script
            .key(Self::seats_key(show_id))
            .arg(user_id)
            .arg(seat)
            .invoke_async(&mut conn)
            .await
            .map_err(backend)?;

        Ok(removed == 1)
    }

    async fn occupied_seats(&self, show_id: Uuid) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend)?;

        let owners: HashMap<String, String> = conn
            .hgetall(Self::seats_key(show_id))
            .await
            .map_err(backend)?;
        Ok(owners)
    }
}
