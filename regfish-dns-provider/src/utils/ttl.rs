//! TTL 序列化/反序列化工具
//!
//! 提供自定义 Serde 支持：
//! - 序列化: `Duration` -> 整秒数
//! - 反序列化: 整数 或 数字字符串 -> `Duration`

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// 序列化 `Duration` 为整秒数（不足一秒的部分被舍弃）
pub fn serialize<S>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(ttl.as_secs())
}

/// 反序列化：支持整数秒或数字字符串（例如 `"300"`）
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        U64(u64),
        String(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::U64(secs) => Ok(Duration::from_secs(secs)),
        Seconds::String(s) => s
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| Error::custom(format!("Invalid TTL '{s}': {e}"))),
    }
}

/// 将 `Duration` 转换为 API 使用的 `u32` 秒数（超出范围时取上限）
pub fn to_seconds(ttl: Duration) -> u32 {
    u32::try_from(ttl.as_secs()).unwrap_or(u32::MAX)
}
