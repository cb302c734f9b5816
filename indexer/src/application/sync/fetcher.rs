use std::sync::Arc;

use crate::domain::errors::SyncError;
use crate::domain::ports::{ContainerSource, RawContainer, Tip};

/// Pulls bounded, contiguous container ranges from the node's index
#[derive(Clone)]
pub struct ContainerFetcher {
    source: Arc<dyn ContainerSource>,
    batch_size: u64,
}

impl ContainerFetcher {
    pub fn new(source: Arc<dyn ContainerSource>, batch_size: u64) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub async fn tip(&self) -> Result<Tip, SyncError> {
        Ok(self.source.last_accepted().await?)
    }

    /// Containers starting exactly at `start`, ascending and without gaps.
    /// An empty result means nothing new is available yet.
    pub async fn fetch_range(&self, start: u64) -> Result<Vec<RawContainer>, SyncError> {
        let containers = self.source.container_range(start, self.batch_size).await?;
        contiguous_from(start, containers)
    }
}

/// Sort `containers` and keep the run that starts at `start`.
/// A range that begins past `start` would skip data and is rejected.
pub fn contiguous_from(
    start: u64,
    mut containers: Vec<RawContainer>,
) -> Result<Vec<RawContainer>, SyncError> {
    containers.sort_by_key(|c| c.index);
    containers.dedup_by_key(|c| c.index);
    containers.retain(|c| c.index >= start);

    match containers.first() {
        None => return Ok(containers),
        Some(first) if first.index != start => {
            return Err(SyncError::ProcessingError(format!(
                "container range starts at {} instead of {}",
                first.index, start
            )))
        }
        Some(_) => {}
    }

    let run = containers
        .iter()
        .enumerate()
        .take_while(|(offset, c)| c.index == start + *offset as u64)
        .count();
    containers.truncate(run);
    Ok(containers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn container(index: u64) -> RawContainer {
        RawContainer {
            index,
            id: format!("c{}", index),
            bytes: vec![index as u8],
            timestamp: Utc::now(),
        }
    }

    fn indices(containers: &[RawContainer]) -> Vec<u64> {
        containers.iter().map(|c| c.index).collect()
    }

    #[test]
    fn keeps_ascending_run() {
        let out = contiguous_from(5, vec![container(6), container(5), container(7)]).unwrap();
        assert_eq!(indices(&out), vec![5, 6, 7]);
    }

    #[test]
    fn stops_at_first_gap() {
        let out = contiguous_from(5, vec![container(5), container(6), container(8)]).unwrap();
        assert_eq!(indices(&out), vec![5, 6]);
    }

    #[test]
    fn drops_already_processed_and_duplicates() {
        let out =
            contiguous_from(5, vec![container(4), container(5), container(5), container(6)])
                .unwrap();
        assert_eq!(indices(&out), vec![5, 6]);
    }

    #[test]
    fn empty_range_is_not_an_error() {
        assert!(contiguous_from(5, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn range_past_start_is_rejected() {
        assert!(contiguous_from(5, vec![container(7)]).is_err());
    }
}
