// Search inputs accepted by the list endpoints and their validation rules

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

/// Every transaction type the indexer stores
pub const TRANSACTION_TYPES: &[&str] = &[
    "x_base",
    "x_import",
    "x_export",
    "x_create_asset",
    "x_operation",
    "p_create_chain",
    "p_create_subnet",
    "p_add_subnet_validator",
    "p_advance_time",
    "p_reward_validator",
    "p_add_validator",
    "p_add_delegator",
    "p_import",
    "p_export",
    "c_atomic_export",
    "c_atomic_import",
    "c_evm",
];

#[derive(Debug, Clone, Copy)]
enum DayEdge {
    Start,
    End,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Offset of a 1-based page; huge pages are rejected rather than wrapped
fn page_offset(page: i64, limit: i64) -> ApiResult<i64> {
    page.checked_sub(1)
        .and_then(|p| p.checked_mul(limit))
        .ok_or_else(|| ApiError::bad_request("invalid page"))
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Accepts `YYYY-MM-DD`, unix seconds or RFC3339
fn parse_time_filter(input: &str, edge: DayEdge) -> Option<DateTime<Utc>> {
    let is_date = input.len() == 10
        && input
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if is_date {
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
        let time = match edge {
            DayEdge::Start => date.and_hms_opt(0, 0, 0)?,
            DayEdge::End => date.and_hms_opt(23, 59, 59)?,
        };
        return Some(time.and_utc());
    }

    if input.len() == 10 && input.chars().all(|c| c.is_ascii_digit()) {
        let secs: i64 = input.parse().ok()?;
        return DateTime::from_timestamp(secs, 0);
    }

    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

type TimeRange = (Option<DateTime<Utc>>, Option<DateTime<Utc>>);

fn parse_time_range(start: Option<&str>, end: Option<&str>) -> ApiResult<TimeRange> {
    let start_time = match start {
        Some(s) => Some(
            parse_time_filter(s, DayEdge::Start)
                .ok_or_else(|| ApiError::bad_request("invalid start time"))?,
        ),
        None => None,
    };
    let end_time = match end {
        Some(s) => Some(
            parse_time_filter(s, DayEdge::End)
                .ok_or_else(|| ApiError::bad_request("invalid end time"))?,
        ),
        None => None,
    };
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if end < start {
            return Err(ApiError::bad_request(
                "end time must be greater than start time",
            ));
        }
    }
    Ok((start_time, end_time))
}

/// Raw transaction search parameters, from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TxSearchParams {
    pub chain: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub address: Option<String>,
    pub asset: Option<String>,
    pub memo: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_height: Option<i64>,
    pub end_height: Option<i64>,
    pub block_hash: Option<String>,
}

/// Validated transaction search
#[derive(Debug, Clone, PartialEq)]
pub struct TxSearch {
    pub chain: Option<String>,
    pub types: Vec<String>,
    pub addresses: Vec<String>,
    pub asset: Option<String>,
    pub memo_words: Vec<String>,
    pub limit: u64,
    pub offset: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub start_height: Option<i64>,
    pub end_height: Option<i64>,
    pub block_hash: Option<String>,
}

impl TxSearchParams {
    pub fn validate(self) -> ApiResult<TxSearch> {
        let memo = non_empty(self.memo);
        if let Some(memo) = &memo {
            if memo.chars().count() < 3 {
                return Err(ApiError::bad_request("memo field is too short"));
            }
        }

        let limit = match self.limit.unwrap_or(0) {
            0 => 25,
            l if l < 0 => return Err(ApiError::bad_request("invalid limit")),
            l if l > 100 => return Err(ApiError::bad_request("maximum limit value is 100")),
            l => l,
        };
        let mut offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::bad_request("invalid offset"));
        }
        let page = self.page.unwrap_or(0);
        if page > 0 && offset == 0 {
            offset = page_offset(page, limit)?;
        }

        let start_time = non_empty(self.start_time);
        let end_time = non_empty(self.end_time);
        let (start_time, end_time) = parse_time_range(start_time.as_deref(), end_time.as_deref())?;

        let types = split_list(self.tx_type.as_deref());
        if let Some(unknown) = types.iter().find(|t| !TRANSACTION_TYPES.contains(&t.as_str())) {
            return Err(ApiError::bad_request(format!(
                "invalid transaction type: {}",
                unknown
            )));
        }

        Ok(TxSearch {
            chain: non_empty(self.chain),
            types,
            addresses: split_list(self.address.as_deref()),
            asset: non_empty(self.asset),
            memo_words: memo
                .map(|m| m.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            limit: limit as u64,
            offset: offset as u64,
            start_time,
            end_time,
            start_height: self.start_height.filter(|h| *h > 0),
            end_height: self.end_height.filter(|h| *h > 0),
            block_hash: non_empty(self.block_hash),
        })
    }
}

/// Raw event search parameters
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventSearchParams {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub scope: Option<String>,
    pub chain: Option<String>,
    pub item_id: Option<String>,
    pub item_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_height: Option<i64>,
    pub end_height: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventSearch {
    pub types: Vec<String>,
    pub scope: Option<String>,
    pub chain: Option<String>,
    /// Item id and type, always given together
    pub item: Option<(String, String)>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub start_height: Option<i64>,
    pub end_height: Option<i64>,
    pub limit: u64,
    pub offset: u64,
}

impl EventSearchParams {
    pub fn validate(self) -> ApiResult<EventSearch> {
        let item = match (non_empty(self.item_id), non_empty(self.item_type)) {
            (Some(id), Some(item_type)) => {
                if item_type != "validator" && item_type != "delegator" {
                    return Err(ApiError::bad_request("invalid item type"));
                }
                Some((id, item_type))
            }
            (None, None) => None,
            _ => {
                return Err(ApiError::bad_request(
                    "item id and item type must be provided together",
                ))
            }
        };

        let start_time = non_empty(self.start_time);
        let end_time = non_empty(self.end_time);
        let (start_time, end_time) = parse_time_range(start_time.as_deref(), end_time.as_deref())?;

        let limit = match self.limit.unwrap_or(0) {
            0 => 100,
            l if l < 0 => return Err(ApiError::bad_request("invalid limit")),
            l if l > 1000 => return Err(ApiError::bad_request("max limit is 1000")),
            l => l,
        };
        let mut offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::bad_request("invalid offset"));
        }
        let page = self.page.unwrap_or(0);
        if page < 0 {
            return Err(ApiError::bad_request("invalid page"));
        }
        if page > 0 {
            offset = page_offset(page, limit)?;
        }

        Ok(EventSearch {
            types: split_list(self.event_type.as_deref()),
            scope: non_empty(self.scope),
            chain: non_empty(self.chain),
            item,
            start_time,
            end_time,
            start_height: self.start_height.filter(|h| *h > 0),
            end_height: self.end_height.filter(|h| *h > 0),
            limit: limit as u64,
            offset: offset as u64,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOrder {
    HeightAsc,
    HeightDesc,
}

/// Raw block search parameters
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlockSearchParams {
    pub chain: Option<String>,
    #[serde(rename = "type")]
    pub block_type: Option<String>,
    pub start_height: Option<i64>,
    pub end_height: Option<i64>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSearch {
    pub chain: String,
    pub types: Vec<String>,
    pub start_height: Option<i64>,
    pub end_height: Option<i64>,
    pub order: BlockOrder,
    pub limit: u64,
    pub offset: u64,
}

impl BlockSearchParams {
    pub fn validate(self) -> ApiResult<BlockSearch> {
        let chain =
            non_empty(self.chain).ok_or_else(|| ApiError::bad_request("chain ID is required"))?;

        let limit = match self.limit.unwrap_or(0) {
            0 => 100,
            l if l < 0 => return Err(ApiError::bad_request("invalid limit")),
            l if l > 100 => return Err(ApiError::bad_request("max limit is 100")),
            l => l,
        };

        let start_height = self.start_height.unwrap_or(0);
        if start_height < 0 {
            return Err(ApiError::bad_request("invalid start height"));
        }
        let end_height = self.end_height.unwrap_or(0);
        if end_height < 0 {
            return Err(ApiError::bad_request("invalid end height"));
        }

        let order = match non_empty(self.order).as_deref() {
            None if start_height > 0 => BlockOrder::HeightAsc,
            None => BlockOrder::HeightDesc,
            Some("height_asc") => BlockOrder::HeightAsc,
            Some("height_desc") => BlockOrder::HeightDesc,
            Some(_) => return Err(ApiError::bad_request("invalid order")),
        };

        let mut offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::bad_request("invalid offset"));
        }
        let page = self.page.unwrap_or(0);
        if page > 0 && offset == 0 {
            offset = page_offset(page, limit)?;
        }

        Ok(BlockSearch {
            chain,
            types: split_list(self.block_type.as_deref()),
            start_height: Some(start_height).filter(|h| *h > 0),
            end_height: Some(end_height).filter(|h| *h > 0),
            order,
            limit: limit as u64,
            offset: offset as u64,
        })
    }
}

/// Validator listing filters
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValidatorSearchParams {
    pub reward_address: Option<String>,
    pub capacity_percent_min: Option<u32>,
    pub capacity_percent_max: Option<u32>,
}

impl ValidatorSearchParams {
    pub fn validate(self) -> ApiResult<Self> {
        if self.capacity_percent_min.unwrap_or(0) > 100 {
            return Err(ApiError::bad_request(
                "capacity_percent_min must be below 100",
            ));
        }
        if self.capacity_percent_max.unwrap_or(0) > 100 {
            return Err(ApiError::bad_request(
                "capacity_percent_max must be below 100",
            ));
        }
        Ok(Self {
            reward_address: non_empty(self.reward_address),
            ..self
        })
    }
}

/// Delegation listing filters
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DelegationSearchParams {
    pub node_id: Option<String>,
    pub reward_address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsBucket {
    Hour,
    Day,
}

impl StatsBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsBucket::Hour => "h",
            StatsBucket::Day => "d",
        }
    }

    fn default_limit(&self) -> u64 {
        match self {
            StatsBucket::Hour => 24,
            StatsBucket::Day => 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NetworkStatsParams {
    pub bucket: Option<String>,
    pub limit: Option<i64>,
}

impl NetworkStatsParams {
    /// Bucket defaults to hourly; the limit is capped at 100 and defaults to one day
    /// of hourly or one month of daily buckets
    pub fn validate(self) -> ApiResult<(StatsBucket, u64)> {
        let bucket = match non_empty(self.bucket).as_deref() {
            None | Some("h") => StatsBucket::Hour,
            Some("d") => StatsBucket::Day,
            Some(_) => return Err(ApiError::bad_request("invalid bucket value")),
        };
        let limit = match self.limit.unwrap_or(0) {
            l if l <= 0 => bucket.default_limit(),
            l => l.min(100) as u64,
        };
        Ok((bucket, limit))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChainQuery {
    pub chain: Option<String>,
}

impl ChainQuery {
    pub fn chain(&self) -> Option<&str> {
        self.chain.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssetQuery {
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HeightQuery {
    pub height: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bad_request(result: ApiResult<impl std::fmt::Debug>) -> String {
        match result {
            Err(ApiError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn tx_search_defaults() {
        let search = TxSearchParams::default().validate().unwrap();
        assert_eq!(search.limit, 25);
        assert_eq!(search.offset, 0);
        assert!(search.types.is_empty());
        assert!(search.start_time.is_none());
    }

    #[test]
    fn tx_search_limits_and_pages() {
        let params = TxSearchParams {
            limit: Some(101),
            ..Default::default()
        };
        assert_eq!(bad_request(params.validate()), "maximum limit value is 100");

        let search = TxSearchParams {
            limit: Some(10),
            page: Some(3),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(search.offset, 20);

        let search = TxSearchParams {
            limit: Some(10),
            page: Some(3),
            offset: Some(5),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(search.offset, 5);
    }

    #[test]
    fn tx_search_rejects_short_memo_and_unknown_type() {
        let params = TxSearchParams {
            memo: Some("ab".into()),
            ..Default::default()
        };
        assert_eq!(bad_request(params.validate()), "memo field is too short");

        let params = TxSearchParams {
            tx_type: Some("p_add_validator,x_mint".into()),
            ..Default::default()
        };
        assert_eq!(
            bad_request(params.validate()),
            "invalid transaction type: x_mint"
        );

        let search = TxSearchParams {
            tx_type: Some("p_add_validator,p_add_delegator".into()),
            memo: Some("hello  world".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(search.types, vec!["p_add_validator", "p_add_delegator"]);
        assert_eq!(search.memo_words, vec!["hello", "world"]);
    }

    #[test]
    fn time_filters_accept_three_formats() {
        let search = TxSearchParams {
            start_time: Some("2021-03-01".into()),
            end_time: Some("2021-03-01".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(
            search.start_time,
            Some(Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            search.end_time,
            Some(Utc.with_ymd_and_hms(2021, 3, 1, 23, 59, 59).unwrap())
        );

        let search = TxSearchParams {
            start_time: Some("1614556800".into()),
            end_time: Some("2021-03-02T10:00:00+02:00".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(
            search.start_time,
            Some(Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            search.end_time,
            Some(Utc.with_ymd_and_hms(2021, 3, 2, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn time_filters_reject_garbage_and_inverted_ranges() {
        let params = TxSearchParams {
            start_time: Some("yesterday".into()),
            ..Default::default()
        };
        assert_eq!(bad_request(params.validate()), "invalid start time");

        let params = TxSearchParams {
            start_time: Some("2021-03-02".into()),
            end_time: Some("2021-03-01".into()),
            ..Default::default()
        };
        assert_eq!(
            bad_request(params.validate()),
            "end time must be greater than start time"
        );
    }

    #[test]
    fn event_search_item_rules() {
        let params = EventSearchParams {
            item_id: Some("NodeID-abc".into()),
            ..Default::default()
        };
        assert_eq!(
            bad_request(params.validate()),
            "item id and item type must be provided together"
        );

        let params = EventSearchParams {
            item_id: Some("NodeID-abc".into()),
            item_type: Some("subnet".into()),
            ..Default::default()
        };
        assert_eq!(bad_request(params.validate()), "invalid item type");

        let search = EventSearchParams {
            item_id: Some("NodeID-abc".into()),
            item_type: Some("validator".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(
            search.item,
            Some(("NodeID-abc".to_string(), "validator".to_string()))
        );
    }

    #[test]
    fn event_search_paging() {
        let search = EventSearchParams::default().validate().unwrap();
        assert_eq!((search.limit, search.offset), (100, 0));

        let search = EventSearchParams {
            limit: Some(50),
            page: Some(4),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(search.offset, 150);

        for params in [
            EventSearchParams {
                limit: Some(-1),
                ..Default::default()
            },
            EventSearchParams {
                limit: Some(1001),
                ..Default::default()
            },
            EventSearchParams {
                offset: Some(-5),
                ..Default::default()
            },
            EventSearchParams {
                page: Some(-1),
                ..Default::default()
            },
        ] {
            assert!(params.validate().is_err());
        }
    }

    #[test]
    fn block_search_requires_chain() {
        assert_eq!(
            bad_request(BlockSearchParams::default().validate()),
            "chain ID is required"
        );
    }

    #[test]
    fn block_search_order_defaults_follow_start_height() {
        let search = BlockSearchParams {
            chain: Some("P".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(search.order, BlockOrder::HeightDesc);
        assert_eq!(search.limit, 100);

        let search = BlockSearchParams {
            chain: Some("P".into()),
            start_height: Some(10),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(search.order, BlockOrder::HeightAsc);
        assert_eq!(search.start_height, Some(10));

        let params = BlockSearchParams {
            chain: Some("P".into()),
            order: Some("time".into()),
            ..Default::default()
        };
        assert_eq!(bad_request(params.validate()), "invalid order");

        let params = BlockSearchParams {
            chain: Some("P".into()),
            end_height: Some(-3),
            ..Default::default()
        };
        assert_eq!(bad_request(params.validate()), "invalid end height");
    }

    #[test]
    fn network_stats_bucket_and_limit() {
        let (bucket, limit) = NetworkStatsParams::default().validate().unwrap();
        assert_eq!((bucket, limit), (StatsBucket::Hour, 24));

        let (bucket, limit) = NetworkStatsParams {
            bucket: Some("d".into()),
            limit: Some(0),
        }
        .validate()
        .unwrap();
        assert_eq!((bucket, limit), (StatsBucket::Day, 30));

        let (_, limit) = NetworkStatsParams {
            bucket: None,
            limit: Some(500),
        }
        .validate()
        .unwrap();
        assert_eq!(limit, 100);

        let params = NetworkStatsParams {
            bucket: Some("w".into()),
            limit: None,
        };
        assert_eq!(bad_request(params.validate()), "invalid bucket value");
    }

    #[test]
    fn validator_capacity_bounds() {
        let params = ValidatorSearchParams {
            capacity_percent_max: Some(101),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = ValidatorSearchParams {
            capacity_percent_min: Some(20),
            capacity_percent_max: Some(100),
            reward_address: Some(String::new()),
        }
        .validate()
        .unwrap();
        assert!(params.reward_address.is_none());
    }

    #[test]
    fn huge_pages_are_rejected() {
        let tx = TxSearchParams {
            page: Some(i64::MAX / 10),
            limit: Some(100),
            ..Default::default()
        };
        assert_eq!(bad_request(tx.validate()), "invalid page");

        let events = EventSearchParams {
            page: Some(i64::MAX),
            limit: Some(1000),
            ..Default::default()
        };
        assert_eq!(bad_request(events.validate()), "invalid page");

        let blocks = BlockSearchParams {
            chain: Some("X".to_string()),
            page: Some(i64::MAX),
            ..Default::default()
        };
        assert_eq!(bad_request(blocks.validate()), "invalid page");
    }

    #[test]
    fn page_zero_is_the_first_page() {
        let tx = TxSearchParams {
            page: Some(0),
            limit: Some(10),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(tx.offset, 0);

        let events = EventSearchParams {
            page: Some(0),
            limit: Some(10),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(events.offset, 0);

        let events = EventSearchParams {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(events.offset, 20);
    }
}
