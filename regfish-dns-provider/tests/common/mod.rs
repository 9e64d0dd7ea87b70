//! 集成测试共用的宏、记录构造和 live 测试上下文

#![allow(dead_code)]

use std::env;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use regfish_dns_provider::{Record, RecordData, RegfishCredentials, RegfishProvider};
use tokio_util::sync::CancellationToken;

/// 缺少任一环境变量时直接结束测试
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skip: {} not set", $var);
                return;
            }
        )+
    };
}

/// 断言为 `Ok` 并取出值
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 以 `_test-` 开头的唯一记录名；`service` 非空时追加为 SRV 风格后缀（如 `._tcp`）
pub fn test_record_name(service: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("_test-{}{service}", &id[..8])
}

pub fn v4(last: u8) -> RecordData {
    RecordData::Address {
        ip: Ipv4Addr::new(192, 0, 2, last).into(),
    }
}

pub fn v6(last: u16) -> RecordData {
    RecordData::Address {
        ip: Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, last).into(),
    }
}

/// live 测试上下文
#[derive(Debug)]
pub struct TestContext {
    pub provider: RegfishProvider,
    pub zone: String,
    pub cancel: CancellationToken,
}

impl TestContext {
    /// 从 `REGFISH_API_TOKEN` / `TEST_DOMAIN` 创建测试上下文
    pub fn regfish() -> Option<Self> {
        let api_token = env::var("REGFISH_API_TOKEN").ok()?;
        let zone = env::var("TEST_DOMAIN").ok()?;

        Some(Self {
            provider: RegfishProvider::new(RegfishCredentials::new(api_token)),
            zone,
            cancel: CancellationToken::new(),
        })
    }

    pub fn record(name: &str, ttl_secs: u64, data: RecordData) -> Record {
        Record::new(name, Duration::from_secs(ttl_secs), data)
    }

    /// 删除 zone 中所有 `_test-` 残留记录
    pub async fn cleanup_all_test_records(&self) {
        let Ok(records) = self.provider.list_records(&self.zone, &self.cancel).await else {
            return;
        };
        let leftovers: Vec<Record> = records
            .into_iter()
            .filter(|r| r.name.starts_with("_test-"))
            .collect();
        if !leftovers.is_empty() {
            let _ = self
                .provider
                .delete_records(&self.zone, &leftovers, &self.cancel)
                .await;
        }
    }
}
