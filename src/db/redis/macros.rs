/// Read-through caching over an optional [`Cache`](crate::db::Cache).
///
/// Looks the key up first. On a hit the cached value is returned. On a miss,
/// or when no cache is configured, the block is awaited and its `Ok` value is
/// queued for a background write. Cache read failures count as a miss, so the
/// cache can never make the block's caller fail.
///
/// # Arguments
/// * `$cache`: `Option<Cache>` expression (borrowed, evaluated twice).
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live for the written value, in seconds.
/// * `$block`: future producing `AppResult<T>` on a miss.
///
/// # Example
/// ```rust,ignore
/// let metadata = cached!(self.cache, CacheKey::Metadata(title.to_string()), ttl, async move {
///     self.fetch(title).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let hit = match $cache.as_ref() {
            Some(cache) => cache.get_or_miss(&$key).await,
            None => None,
        };
        if let Some(cached) = hit {
            Ok(cached)
        } else {
            match $block.await {
                Ok(value) => {
                    if let Some(cache) = $cache.as_ref() {
                        cache.set_in_background(&$key, &value, $ttl);
                    }
                    Ok(value)
                }
                Err(e) => Err(e),
            }
        }
    }};
}
