use chrono::Duration;
use rand::Rng;
use rust_decimal::Decimal;
use tuitionpay::application::service::PaymentService;
use tuitionpay::config::AppConfig;
use tuitionpay::domain::balance::{BalanceMode, BalanceResolver};
use tuitionpay::domain::money::Money;
use tuitionpay::domain::ports::FixedClock;
use tuitionpay::infrastructure::in_memory::InMemoryRecordStore;
use tuitionpay::infrastructure::notifier::LogNotifier;
use tuitionpay::interfaces::email::confirmation::ConfirmationTemplate;

mod common;
use common::{date, random_selection, submission};

const ROUNDS: usize = 500;

fn service(config: &AppConfig) -> PaymentService {
    PaymentService::new(
        config,
        Box::new(LogNotifier::new(ConfirmationTemplate::new(
            config.institution.clone(),
        ))),
        Box::new(InMemoryRecordStore::new()),
        Box::new(FixedClock(date(2024, 8, 1))),
    )
    .unwrap()
}

fn random_money<R: Rng>(rng: &mut R, max_cents: i64) -> Money {
    Money::new(Decimal::new(rng.gen_range(0..=max_cents), 2))
}

#[test]
fn test_running_balance_is_never_negative() {
    let mut rng = rand::thread_rng();
    for _ in 0..ROUNDS {
        let resolver = BalanceResolver::new(BalanceMode::Running {
            initial_balance: random_money(&mut rng, 1_000_000),
        })
        .unwrap();
        let summary = resolver.resolve(
            random_money(&mut rng, 1_000_000),
            random_money(&mut rng, 100_000),
            None,
        );
        assert!(!summary.balance.is_negative(), "{summary:?}");
        assert_eq!(summary.total_paid, summary.total_due + summary.penalties);
    }
}

#[test]
fn test_no_penalty_on_or_before_any_due_date() {
    let config = AppConfig::default();
    let service = service(&config);
    let earliest_due = config
        .installments
        .iter()
        .map(|i| i.due_date)
        .min()
        .unwrap();
    let mut rng = rand::thread_rng();

    for _ in 0..ROUNDS {
        let ids = random_selection(&mut rng);
        let reference = earliest_due - Duration::days(rng.gen_range(0..400));
        let summary = service.summarize(&submission(&ids), reference).unwrap();
        assert_eq!(summary.penalties, Money::ZERO, "{ids:?} at {reference}");
    }
}

#[test]
fn test_penalty_is_never_negative_and_grows_with_lateness() {
    let config = AppConfig::default();
    let service = service(&config);
    let mut rng = rand::thread_rng();

    for _ in 0..ROUNDS {
        let ids = random_selection(&mut rng);
        let reference = date(2024, 7, 1) + Duration::days(rng.gen_range(0..365));
        let later = reference + Duration::days(rng.gen_range(1..30));
        let now = service.summarize(&submission(&ids), reference).unwrap();
        let then = service.summarize(&submission(&ids), later).unwrap();
        assert!(!now.penalties.is_negative());
        assert!(then.penalties >= now.penalties, "{ids:?} {reference} -> {later}");
        assert_eq!(now.total_due, then.total_due);
    }
}

#[test]
fn test_summaries_are_deterministic() {
    let config = AppConfig::default();
    let service = service(&config);
    let mut rng = rand::thread_rng();

    for _ in 0..ROUNDS {
        let ids = random_selection(&mut rng);
        let reference = date(2024, 7, 1) + Duration::days(rng.gen_range(0..365));
        let first = service.summarize(&submission(&ids), reference).unwrap();
        let second = service.summarize(&submission(&ids), reference).unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
