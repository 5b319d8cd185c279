use criterion::{criterion_group, criterion_main, Criterion};

use chrono::{Duration, NaiveDate};
use models::{CustomerRecord, ServiceType};
use rust_decimal::Decimal;
use service::finance::{summarize, CostTable};
use service::query::query;
use service::schedule::AlertWindow;
use service::storage::MemoryStorage;
use service::RecordStore;

fn seed(n: i64) -> Vec<CustomerRecord> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let service = match i % 3 { 0 => ServiceType::Unitv, 1 => ServiceType::Iptv, _ => ServiceType::Other };
            CustomerRecord::new(format!("Customer {i}"), base + Duration::days((i * 7919) % 365), service, Decimal::new(1500 + i % 2000, 2))
                .unwrap()
        })
        .collect()
}

fn bench_views(c: &mut Criterion) {
    // load the store outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let store = rt.block_on(RecordStore::open(MemoryStorage::with_records(seed(1000)))).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let costs = CostTable::default();

    c.bench_function("query_filter_sort_1k", |b| {
        b.iter(|| query(store.entries(), "customer 1"));
    });

    c.bench_function("dashboard_summary_1k", |b| {
        b.iter(|| summarize(store.records(), &costs, today, AlertWindow::EXTENDED));
    });
}

criterion_group!(benches, bench_views);
criterion_main!(benches);
