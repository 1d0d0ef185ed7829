//! Answer cache reads and writes.

use super::connection::CacheDb;
use super::key::CacheKey;
use super::keyboard;
use crate::Error;
use crate::answer::{Answer, CachedAnswer};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheDb {
    /// Get a cached answer by normalized key.
    ///
    /// Returns None if the key has never been stored.
    pub async fn get_answer(&self, key: &CacheKey) -> Result<Option<CachedAnswer>, Error> {
        let key = key.as_str().to_string();
        self.conn
            .call(move |conn| -> Result<Option<CachedAnswer>, Error> {
                let mut stmt =
                    conn.prepare("SELECT response_text, keyboard_json, photo_url FROM cache WHERE query_key = ?1")?;

                let result = stmt.query_row(params![key], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?, row.get::<_, Option<String>>(2)?))
                });

                match result {
                    Ok((text, keyboard_json, image)) => {
                        let actions = keyboard::decode(keyboard_json.as_deref())?;
                        Ok(Some(CachedAnswer { key, answer: Answer { text, actions, image } }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace the answer stored under `key`.
    ///
    /// Last writer wins; nothing from a previous row is merged.
    pub async fn put_answer(&self, key: &CacheKey, answer: &Answer) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::InvalidInput("cache key cannot be empty".into()));
        }

        let key = key.as_str().to_string();
        let keyboard_json = keyboard::encode(&answer.actions)?;
        let text = answer.text.clone();
        let image = answer.image.clone();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache (query_key, response_text, keyboard_json, photo_url)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(query_key) DO UPDATE SET
                        response_text = excluded.response_text,
                        keyboard_json = excluded.keyboard_json,
                        photo_url = excluded.photo_url",
                    params![key, text, keyboard_json, image],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of cached answers.
    pub async fn count_answers(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
