use budget_manager::ledger::Ledger;
use budget_manager::projection::ProjectionPolicy;
use budget_manager::storage::{load_ledger_from_path, save_ledger_to_path};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

fn build_sample_ledger(entries: usize) -> Ledger {
    let mut ledger = Ledger::new(25, 84_000.0);
    for idx in 0..entries {
        ledger.add_income(format!("Income {idx}"), 100.0 + (idx % 50) as f64);
        ledger.add_expense(
            format!("Expense {idx}"),
            20.0 + (idx % 30) as f64,
            format!("Category {}", idx % 12),
        );
        ledger.add_bill(format!("Bill {idx}"), 15.0);
        ledger.add_investment(
            format!("Fund {idx}"),
            1_000.0 + idx as f64,
            0.02 + (idx % 7) as f64 / 100.0,
        );
        ledger.add_debt(format!("Loan {idx}"), 5_000.0, 0.06, 40.0);
    }
    ledger
}

fn bench_projection(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(1_000));

    c.bench_function("retirement_flat_40y", |b| {
        b.iter(|| black_box(ledger.estimate_retirement_amount(black_box(65))))
    });

    c.bench_function("retirement_per_investment_40y", |b| {
        b.iter(|| {
            black_box(ledger.estimate_retirement_with(65, ProjectionPolicy::PerInvestment))
        })
    });

    c.bench_function("projection_schedule_40y", |b| {
        b.iter(|| black_box(ledger.projection_schedule(65, ProjectionPolicy::PerInvestment)))
    });

    c.bench_function("monthly_savings_1k", |b| {
        b.iter(|| black_box(ledger.monthly_savings()))
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(1_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("ledger.json");

    c.bench_function("snapshot_save_1k", |b| {
        b.iter(|| {
            save_ledger_to_path(&ledger, &file_path).expect("save ledger");
        })
    });

    save_ledger_to_path(&ledger, &file_path).expect("seed");

    c.bench_function("snapshot_load_1k", |b| {
        b.iter(|| {
            let loaded = load_ledger_from_path(&file_path).expect("load ledger");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_projection, bench_snapshot_io);
criterion_main!(benches);
