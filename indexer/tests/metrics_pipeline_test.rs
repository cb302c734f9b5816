use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use avalanche_indexer::application::pipeline::MetricsPipeline;
use avalanche_indexer::domain::models::{
    Delegation, NetworkMetric, StatsBucket, Validator, ValidatorSeq,
};
use avalanche_indexer::domain::ports::{MetricsStore, NetworkSource};
use avalanche_indexer::infrastructure::node::types::{
    Blockchain, MinStakeResponse, Peer, TxFeeResponse, ValidatorsResponse,
};
use avalanche_indexer::infrastructure::node::NodeClientError;
use avalanche_indexer::infrastructure::persistence::DbError;

struct Node;

#[async_trait]
impl NetworkSource for Node {
    async fn network_name(&self) -> Result<String, NodeClientError> {
        Ok("mainnet".to_string())
    }

    async fn node_version(&self) -> Result<String, NodeClientError> {
        Ok("avalanche/1.10.0".to_string())
    }

    async fn current_validators(&self) -> Result<ValidatorsResponse, NodeClientError> {
        let body = json!({
            "validators": [{
                "txID": "tx-a",
                "startTime": "1600000000",
                "endTime": "1700000000",
                "weight": "2000000000000",
                "nodeID": "NodeID-A",
                "validationRewardOwner": { "locktime": "0", "threshold": "1", "addresses": ["P-avax1a"] },
                "potentialReward": "1000",
                "delegationFee": "2.0000",
                "uptime": "0.9950",
                "connected": true,
                "delegators": [{
                    "txID": "tx-d",
                    "startTime": "1600000100",
                    "endTime": "1600100000",
                    "stakeAmount": "25000000000",
                    "nodeID": "NodeID-A",
                    "rewardOwner": { "locktime": "0", "threshold": "1", "addresses": ["P-avax1d"] },
                    "potentialReward": "10"
                }]
            }],
            "delegators": []
        });
        serde_json::from_value(body).map_err(NodeClientError::JsonError)
    }

    async fn pending_validators(&self) -> Result<ValidatorsResponse, NodeClientError> {
        Ok(ValidatorsResponse::default())
    }

    async fn current_height(&self) -> Result<u64, NodeClientError> {
        Ok(1234)
    }

    async fn min_stake(&self) -> Result<MinStakeResponse, NodeClientError> {
        Ok(MinStakeResponse {
            min_validator_stake: "2000000000000".to_string(),
            min_delegator_stake: "25000000000".to_string(),
        })
    }

    async fn blockchains(&self) -> Result<Vec<Blockchain>, NodeClientError> {
        Ok(Vec::new())
    }

    async fn peers(&self) -> Result<Vec<Peer>, NodeClientError> {
        Ok(Vec::new())
    }

    async fn tx_fee(&self) -> Result<TxFeeResponse, NodeClientError> {
        Ok(TxFeeResponse {
            creation_tx_fee: "10000000".to_string(),
            tx_fee: "1000000".to_string(),
        })
    }
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
    addresses: Mutex<Vec<String>>,
    validators: Mutex<Vec<Validator>>,
    metric: Mutex<Option<NetworkMetric>>,
}

impl Recorder {
    fn log(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl MetricsStore for Recorder {
    async fn import_addresses(&self, addresses: &[String]) -> Result<(), DbError> {
        self.log("addresses");
        *self.addresses.lock().unwrap() = addresses.to_vec();
        Ok(())
    }

    async fn import_validators(&self, validators: &[Validator]) -> Result<(), DbError> {
        self.log("validators");
        *self.validators.lock().unwrap() = validators.to_vec();
        Ok(())
    }

    async fn import_validator_seqs(&self, _seqs: &[ValidatorSeq]) -> Result<(), DbError> {
        self.log("validator_seqs");
        Ok(())
    }

    async fn import_delegations(&self, _delegations: &[Delegation]) -> Result<(), DbError> {
        self.log("delegations");
        Ok(())
    }

    async fn create_network_metric(&self, metric: &NetworkMetric) -> Result<(), DbError> {
        self.log("network_metric");
        *self.metric.lock().unwrap() = Some(metric.clone());
        Ok(())
    }

    async fn create_network_stats(
        &self,
        _time: DateTime<Utc>,
        bucket: StatsBucket,
    ) -> Result<(), DbError> {
        self.log(&format!("network_stats_{}", bucket.as_str()));
        Ok(())
    }

    async fn create_validator_stats(
        &self,
        _time: DateTime<Utc>,
        bucket: StatsBucket,
    ) -> Result<(), DbError> {
        self.log(&format!("validator_stats_{}", bucket.as_str()));
        Ok(())
    }

    async fn purge_validator_seqs(&self, _before: DateTime<Utc>) -> Result<u64, DbError> {
        Ok(0)
    }
}

#[tokio::test]
async fn snapshot_is_parsed_and_stored_in_order() {
    let store = Arc::new(Recorder::default());
    let pipeline = MetricsPipeline::standard(Arc::new(Node), store.clone());

    let payload = pipeline.run().await.unwrap();
    assert_eq!(payload.network_name, "mainnet");
    assert_eq!(payload.height, 1234);

    let hour = StatsBucket::Hour.as_str();
    let day = StatsBucket::Day.as_str();
    assert_eq!(
        *store.calls.lock().unwrap(),
        vec![
            "addresses".to_string(),
            "validators".to_string(),
            "validator_seqs".to_string(),
            "delegations".to_string(),
            "network_metric".to_string(),
            format!("network_stats_{}", hour),
            format!("validator_stats_{}", hour),
            format!("network_stats_{}", day),
            format!("validator_stats_{}", day),
        ]
    );
    assert_eq!(*store.addresses.lock().unwrap(), vec!["P-avax1a", "P-avax1d"]);

    let validators = store.validators.lock().unwrap();
    let validator = &validators[0];
    assert_eq!(validator.stake_amount, 2_000_000_000_000);
    assert_eq!(validator.stake_percent, 100.0);
    assert_eq!(validator.delegated_amount, 25_000_000_000);
    assert_eq!(validator.capacity, 8_000_000_000_000 - 25_000_000_000);
    assert!((validator.uptime - 99.5).abs() < 1e-9);
    assert_eq!(validator.first_height, 1234);

    let metric = store.metric.lock().unwrap().clone().unwrap();
    assert_eq!(metric.active_validators_count, 1);
    assert_eq!(metric.active_delegations_count, 1);
    assert_eq!(metric.tx_fee, 1_000_000);
    assert_eq!(metric.total_delegated, 25_000_000_000);
}
