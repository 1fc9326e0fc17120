//! 필드 프로파일 정의.
//!
//! 각 프로파일은 출력 필드 이름 → 우선순위 순 제공자 필드 목록의 매핑입니다.
//! 목록에서 처음으로 값이 존재하는 필드가 채택됩니다
//! (예: `price := currentPrice, 없으면 regularMarketPrice`).
//!
//! | 프로파일   | 트리거      | 필드 수 |
//! |------------|-------------|---------|
//! | `realtime` | `intraday`  | 7       |
//! | `daily`    | `daily`     | 7       |
//! | `monthly`  | `weekly`    | 3       |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CoreError, QuoteSnapshot};

/// 프로파일 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// 장중 시세 (5분 주기)
    Realtime,
    /// 일간 지표
    Daily,
    /// 주간 갱신 지표 (문서에는 `monthly`로 저장)
    Monthly,
}

impl ProfileKind {
    /// 모든 프로파일.
    pub const ALL: [ProfileKind; 3] = [Self::Realtime, Self::Daily, Self::Monthly];

    /// 프로파일 이름 (중첩 매핑의 키로도 사용).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }

    /// 이 프로파일을 선택하는 트리거 값.
    pub fn trigger(&self) -> &'static str {
        match self {
            Self::Realtime => "intraday",
            Self::Daily => "daily",
            Self::Monthly => "weekly",
        }
    }

    /// 트리거 값에서 프로파일을 선택합니다.
    ///
    /// 트리거가 없으면 `intraday`(realtime)가 기본값입니다.
    pub fn from_trigger(trigger: Option<&str>) -> Result<Self, CoreError> {
        match trigger.unwrap_or("intraday") {
            "intraday" => Ok(Self::Realtime),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Monthly),
            other => Err(CoreError::UnknownProfile(other.to_string())),
        }
    }

    /// 프로파일의 필드 정의.
    pub fn profile(&self) -> FieldProfile {
        match self {
            Self::Realtime => FieldProfile::REALTIME,
            Self::Daily => FieldProfile::DAILY,
            Self::Monthly => FieldProfile::MONTHLY,
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_trigger(Some(s))
    }
}

/// 단일 출력 필드 정의.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// 중첩 매핑 내 필드 이름
    pub output: &'static str,
    /// 하위 호환용 평면 필드 이름
    pub flat: &'static str,
    /// 우선순위 순 제공자 필드 이름
    pub sources: &'static [&'static str],
}

impl FieldSpec {
    const fn new(
        output: &'static str,
        flat: &'static str,
        sources: &'static [&'static str],
    ) -> Self {
        Self {
            output,
            flat,
            sources,
        }
    }

    /// 스냅샷에서 처음으로 존재하는 값을 선택합니다.
    ///
    /// 부재 여부로만 판단하므로 `0.0`도 유효한 값으로 채택됩니다.
    pub fn resolve(&self, snapshot: &QuoteSnapshot) -> Option<f64> {
        self.sources.iter().find_map(|source| snapshot.get(source))
    }
}

/// 이름이 붙은 필드 묶음.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldProfile {
    /// 프로파일 종류
    pub kind: ProfileKind,
    /// 출력 필드 목록
    pub fields: &'static [FieldSpec],
}

impl FieldProfile {
    /// 장중 시세 프로파일.
    pub const REALTIME: FieldProfile = FieldProfile {
        kind: ProfileKind::Realtime,
        fields: &[
            FieldSpec::new("price", "Price", &["currentPrice", "regularMarketPrice"]),
            FieldSpec::new("volume", "Volume", &["volume", "regularMarketVolume"]),
            FieldSpec::new("dayHigh", "DayHigh", &["dayHigh", "regularMarketDayHigh"]),
            FieldSpec::new("dayLow", "DayLow", &["dayLow", "regularMarketDayLow"]),
            FieldSpec::new("open", "Open", &["open", "regularMarketOpen"]),
            FieldSpec::new("change", "Change", &["regularMarketChange"]),
            FieldSpec::new(
                "changePercent",
                "ChangePercent",
                &["regularMarketChangePercent"],
            ),
        ],
    };

    /// 일간 지표 프로파일.
    pub const DAILY: FieldProfile = FieldProfile {
        kind: ProfileKind::Daily,
        fields: &[
            FieldSpec::new("marketCap", "MarketCap", &["marketCap"]),
            FieldSpec::new("peRatio", "PE", &["trailingPE", "forwardPE"]),
            FieldSpec::new(
                "previousClose",
                "PreviousClose",
                &["previousClose", "regularMarketPreviousClose"],
            ),
            FieldSpec::new("week52High", "52WeekHigh", &["fiftyTwoWeekHigh"]),
            FieldSpec::new("week52Low", "52WeekLow", &["fiftyTwoWeekLow"]),
            FieldSpec::new("beta", "Beta", &["beta"]),
            FieldSpec::new(
                "avgVolume",
                "AvgVolume",
                &["averageVolume", "averageVolume10days"],
            ),
        ],
    };

    /// 주간 갱신 프로파일.
    pub const MONTHLY: FieldProfile = FieldProfile {
        kind: ProfileKind::Monthly,
        fields: &[
            FieldSpec::new(
                "sharesOutstanding",
                "SharesOutstanding",
                &["sharesOutstanding"],
            ),
            FieldSpec::new("eps", "EPS", &["trailingEps", "forwardEps"]),
            FieldSpec::new("float", "Float", &["floatShares"]),
        ],
    };

    /// 프로파일 이름.
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// 모든 출력 필드를 추출합니다. 값이 없는 필드도 `None`으로 포함됩니다.
    pub fn extract(&self, snapshot: &QuoteSnapshot) -> Vec<(FieldSpec, Option<f64>)> {
        self.fields
            .iter()
            .map(|spec| (*spec, spec.resolve(snapshot)))
            .collect()
    }
}
