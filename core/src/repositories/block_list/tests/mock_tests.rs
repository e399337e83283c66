use chrono::{Duration, Utc};

use crate::domain::entities::BlockList;
use crate::repositories::block_list::{BlockListRepository, MockBlockListRepository};

#[tokio::test]
async fn test_save_replaces_block_list() {
    let repo = MockBlockListRepository::new();
    let mut blocks = BlockList::new();
    blocks.insert("10.0.0.1".to_string(), Utc::now() + Duration::hours(24));

    repo.save(&blocks).await.unwrap();
    assert_eq!(repo.load().await.unwrap(), blocks);

    repo.save(&BlockList::new()).await.unwrap();
    assert!(repo.load().await.unwrap().is_empty());
    assert_eq!(repo.save_count(), 2);
}

#[tokio::test]
async fn test_failing_save_leaves_blocks_untouched() {
    let mut blocks = BlockList::new();
    blocks.insert("10.0.0.1".to_string(), Utc::now() + Duration::hours(1));
    let repo = MockBlockListRepository::with_blocks(blocks.clone());
    repo.set_fail_save(true);

    assert!(repo.save(&BlockList::new()).await.is_err());
    assert_eq!(repo.blocks().await, blocks);
}
