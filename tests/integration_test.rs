use scrapewatch::models::coin::{Contract, CoinOutput, OfficialLink, OutputRecord, SocialLink};
use scrapewatch::models::job::TaskEntry;
use scrapewatch::services::{orchestrator, store::JobStore};
use uuid::Uuid;

/// Integration test: job state round-trip through Redis.
///
/// Covers:
/// 1. Record append and read-back order
/// 2. Task list order
/// 3. Status flag gating the resolver
/// 4. Unknown job id resolving to not-found
///
/// Note: this requires a running Redis instance configured via REDIS_URL.
#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_job_state_roundtrip() {
    let store = test_store();
    let job_id = Uuid::new_v4();

    // Nothing written yet: the job id is unknown
    let missing = orchestrator::resolve_status(&store, job_id)
        .await
        .expect("resolve failed");
    assert!(missing.is_none());

    // Write two records and the matching task list
    let bitcoin = OutputRecord {
        coin: "bitcoin".to_string(),
        output: CoinOutput {
            price: Some(64000.0),
            ..CoinOutput::default()
        },
    };
    let ethereum = OutputRecord {
        coin: "ethereum".to_string(),
        output: CoinOutput::default(),
    };
    store.push_record(job_id, &bitcoin).await.expect("push failed");
    store.push_record(job_id, &ethereum).await.expect("push failed");

    let tasks = vec![
        TaskEntry {
            coin: "bitcoin".to_string(),
            job_id,
        },
        TaskEntry {
            coin: "ethereum".to_string(),
            job_id,
        },
    ];
    store.push_tasks(job_id, &tasks).await.expect("push_tasks failed");

    // Every job-scoped key is written with the retention window armed
    let client = redis::Client::open(std::env::var("REDIS_URL").unwrap().as_str())
        .expect("Failed to open Redis client");
    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");
    let ttl = redis::cmd("TTL")
        .arg(job_id.to_string())
        .query_async::<i64>(&mut conn)
        .await
        .expect("TTL query failed");
    assert!(ttl > 0 && ttl <= 3600);

    // Still not found until the status flag is set
    assert!(orchestrator::resolve_status(&store, job_id)
        .await
        .expect("resolve failed")
        .is_none());

    store.set_completed(job_id).await.expect("set_completed failed");

    let status = orchestrator::resolve_status(&store, job_id)
        .await
        .expect("resolve failed")
        .expect("job not found after completion");

    assert_eq!(status.job_id, job_id);
    assert_eq!(status.tasks.len(), 2);
    assert_eq!(status.tasks[0].coin, "bitcoin");
    assert_eq!(status.tasks[0].output.price, Some(64000.0));
    assert_eq!(status.tasks[1].coin, "ethereum");
    assert_eq!(status.tasks[1].output, CoinOutput::default());
}

/// Two jobs never share store keys: concurrent writes stay invisible to each
/// other and each job resolves to exactly its own tasks.
#[tokio::test]
#[ignore]
async fn test_jobs_are_independent() {
    let store = test_store();
    let job_a = Uuid::new_v4();
    let job_b = Uuid::new_v4();

    let write = |job_id: Uuid, coin: &str| {
        let coin = coin.to_string();
        let store = &store;
        async move {
            let record = OutputRecord {
                coin: coin.clone(),
                output: CoinOutput::default(),
            };
            store.push_record(job_id, &record).await.expect("push failed");
            store
                .push_tasks(job_id, &[TaskEntry { coin, job_id }])
                .await
                .expect("push_tasks failed");
            store.set_completed(job_id).await.expect("set_completed failed");
        }
    };

    futures::join!(write(job_a, "bitcoin"), write(job_b, "ethereum"));

    let status_a = orchestrator::resolve_status(&store, job_a)
        .await
        .expect("resolve failed")
        .expect("job A not found");
    let status_b = orchestrator::resolve_status(&store, job_b)
        .await
        .expect("resolve failed")
        .expect("job B not found");

    assert_eq!(status_a.tasks.len(), 1);
    assert_eq!(status_a.tasks[0].coin, "bitcoin");
    assert_eq!(status_b.tasks.len(), 1);
    assert_eq!(status_b.tasks[0].coin, "ethereum");
}

fn test_store() -> JobStore {
    dotenvy::dotenv().ok();
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    JobStore::new(&redis_url).expect("Failed to initialize job store")
}

/// A fully populated record survives serialization through the store format.
#[test]
fn test_output_record_roundtrip() {
    let record = OutputRecord {
        coin: "bitcoin".to_string(),
        output: CoinOutput {
            price: Some(64230.54),
            price_change: Some(-1.84),
            market_cap: Some(1_266_539_218_506.0),
            market_cap_rank: Some(1),
            volume: Some(35_123_456_789.0),
            volume_rank: Some(2),
            volume_change: Some(2.77),
            circulating_supply: Some(19_712_468.0),
            total_supply: Some(21_000_000.0),
            diluted_market_cap: Some(1_349_316_000_000.0),
            contracts: vec![Contract {
                name: "Ethereum".to_string(),
                address: "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599".to_string(),
            }],
            official_links: vec![OfficialLink {
                name: "website".to_string(),
                link: Some("https://bitcoin.org".to_string()),
            }],
            socials: vec![SocialLink {
                name: "reddit".to_string(),
                url: Some("https://reddit.com/r/Bitcoin".to_string()),
            }],
        },
    };

    let payload = serde_json::to_string(&record).expect("serialize failed");
    let decoded: OutputRecord = serde_json::from_str(&payload).expect("deserialize failed");
    assert_eq!(decoded, record);
}

/// A coin whose scrape produced nothing reports `{}` as its output.
#[test]
fn test_empty_output_serializes_to_empty_object() {
    let output = serde_json::to_value(CoinOutput::default()).expect("serialize failed");
    assert_eq!(output, serde_json::json!({}));
}
