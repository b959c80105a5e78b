use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use verity_bounty::{BountyFund, FractionalBalanceAllocator};
use verity_criteria::{AbsoluteThreshold, Criterion as ClosingCriterion};
use verity_engine::{BountyAwardPolicy, BountySource, ResolutionEngine};
use verity_token::{InMemoryLedger, TokenLedger};
use verity_types::{Address, Amount, Fraction, Status, Timestamp, TxContext, PARTS_PER};

fn tx(caller: &str, block: u64) -> TxContext {
    TxContext::new(caller, block, Timestamp::new(block))
}

/// An engine with `phases` closed phases, each staked by the same two wallets.
fn engine_with_closed_phases(phases: u64) -> ResolutionEngine {
    let mut ledger = InMemoryLedger::new();
    ledger
        .mint(&Address::new("fund"), Amount::from(u64::MAX))
        .unwrap();
    let mut fund = BountyFund::new(
        Address::new("fund"),
        Address::new("token"),
        Address::new("owner"),
        Address::new("operator"),
    );
    let mut engine = ResolutionEngine::new(
        Address::new("engine"),
        Address::new("owner"),
        Address::new("oracle"),
        Address::new("operator"),
        &mut fund,
        ClosingCriterion::AbsoluteThreshold(AbsoluteThreshold::new(Amount::from(100u64))),
        BountyAwardPolicy::Always,
    )
    .unwrap();
    let allocator = FractionalBalanceAllocator::new(
        Address::new("allocator"),
        Address::new("owner"),
        Fraction::new(PARTS_PER / 1000).unwrap(),
    );
    engine
        .set_bounty_allocator(&tx("owner", 0), Address::new("allocator"))
        .unwrap();
    engine
        .initialize(
            &tx("owner", 0),
            BountySource {
                fund: &mut fund,
                allocator: &allocator,
                ledger: &mut ledger,
            },
        )
        .unwrap();

    let alice = Address::new("alice");
    let bob = Address::new("bob");
    for block in 1..=phases {
        engine
            .stake(&tx("oracle", block), &bob, Status::False, Amount::from(40u64))
            .unwrap();
        engine
            .stake(&tx("oracle", block), &alice, Status::True, Amount::from(100u64))
            .unwrap();
        engine
            .resolve_if_criteria_met(
                &tx("oracle", block),
                BountySource {
                    fund: &mut fund,
                    allocator: &allocator,
                    ledger: &mut ledger,
                },
            )
            .unwrap();
    }
    engine
}

fn bench_calculate_payout(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_payout");
    let alice = Address::new("alice");

    for phases in [1u64, 10, 100, 1000] {
        let engine = engine_with_closed_phases(phases);
        group.bench_with_input(BenchmarkId::new("phase_range", phases), &phases, |b, &n| {
            b.iter(|| black_box(engine.calculate_payout(black_box(&alice), 1, n)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_calculate_payout);
criterion_main!(benches);
