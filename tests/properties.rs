//! Property tests for engine invariants.

use chrono::{Duration, NaiveDate, NaiveTime};
use proptest::prelude::*;
use rust_decimal::Decimal;

use staff_ops_engine::config::{ConfigLoader, EngineConfig, EngineSettings};
use staff_ops_engine::engine::{LeaveSubmission, StaffOpsEngine, WorkingSet};
use staff_ops_engine::models::{
    LeaveType, MonthKey, PermissionCatalog, SalaryComponents, StaffMember, commission_amount,
};

fn restaurant_engine() -> StaffOpsEngine {
    let config = ConfigLoader::load("./config/restaurant")
        .expect("Failed to load config")
        .into_config();
    StaffOpsEngine::new(config, WorkingSet::default())
}

fn bare_engine() -> StaffOpsEngine {
    let config = EngineConfig::new(EngineSettings::default(), PermissionCatalog::default());
    StaffOpsEngine::new(config, WorkingSet::default())
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// Amounts in cents, up to 100k.
fn money() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Shift windows on the half hour, including ones that wrap past midnight.
fn window() -> impl Strategy<Value = (NaiveTime, NaiveTime)> {
    (0u32..48, 1u32..24).prop_map(|(start_slot, length_slots)| {
        let start = NaiveTime::from_hms_opt(start_slot / 2, (start_slot % 2) * 30, 0).unwrap();
        let end = start + Duration::minutes(i64::from(length_slots) * 30);
        (start, end)
    })
}

proptest! {
    #[test]
    fn toggling_a_permission_twice_restores_the_role(key_index in 0usize..64, granted in any::<bool>()) {
        let mut engine = restaurant_engine();
        let keys: Vec<String> = engine
            .config()
            .permissions()
            .entries()
            .map(|entry| entry.key.clone())
            .collect();
        let key = keys[key_index % keys.len()].clone();
        let initial = if granted { vec![key.clone()] } else { Vec::new() };
        let role = engine.create_role("Cashier", "", initial).unwrap();

        engine.toggle_permission(role.id, &key).unwrap();
        let restored = engine.toggle_permission(role.id, &key).unwrap();

        prop_assert_eq!(restored.permissions, role.permissions);
    }

    #[test]
    fn net_salary_is_gross_minus_deductions(
        basic_salary in money(),
        hra in money(),
        bonus in money(),
        pf in money(),
        tax in money(),
        sales in money(),
        rate in 0u32..=100,
    ) {
        let mut engine = bare_engine();
        engine.add_staff(StaffMember::new("STF-01", "Asha")).unwrap();
        let month: MonthKey = "2026-03".parse().unwrap();
        let commission = engine
            .record_commission("STF-01", sales, Decimal::from(rate), month)
            .unwrap()
            .commission_amount;

        let components = SalaryComponents { basic_salary, hra, bonus, pf, tax };
        let slip = engine
            .generate_slip("STF-01", month, &components, base_date())
            .unwrap();

        prop_assert_eq!(slip.gross_salary, basic_salary + hra + commission + bonus);
        prop_assert_eq!(slip.deductions, pf + tax);
        prop_assert_eq!(slip.net_salary, slip.gross_salary - slip.deductions);
    }

    #[test]
    fn commission_is_rounded_to_cents(sales in money(), rate_hundredths in 0i64..=10_000) {
        let rate = Decimal::new(rate_hundredths, 2);
        let exact = sales * rate / Decimal::ONE_HUNDRED;
        let amount = commission_amount(sales, rate).unwrap();

        prop_assert!(amount.scale() <= 2);
        prop_assert!((amount - exact).abs() <= Decimal::new(5, 3));
    }

    #[test]
    fn generated_rosters_never_overlap_or_cover_leave(
        windows in prop::collection::vec(window(), 1..5),
        staff_count in 1usize..6,
        headcount in 1u32..4,
        leave_days in prop::collection::vec((0usize..6, 0i64..5), 0..4),
    ) {
        let mut engine = bare_engine();
        for i in 0..staff_count {
            engine
                .add_staff(StaffMember::new(format!("STF-{i:02}"), format!("Staff {i}")))
                .unwrap();
        }
        for (n, (start, end)) in windows.iter().enumerate() {
            engine.create_template(&format!("Shift {n}"), *start, *end).unwrap();
        }
        for (staff_index, offset) in &leave_days {
            let staff_id = format!("STF-{:02}", staff_index % staff_count);
            let day = base_date() + Duration::days(*offset);
            let submission = LeaveSubmission {
                staff_id,
                leave_type: LeaveType::Casual,
                start_date: day,
                end_date: day,
                reason: String::new(),
            };
            let request = engine.submit_leave(submission, base_date()).unwrap();
            engine.approve_leave(request.id, "Manager", base_date()).unwrap();
        }

        let end = base_date() + Duration::days(4);
        engine.generate_roster(base_date(), end, Some(headcount)).unwrap();

        let assignments = engine.scheduler().assignments();
        for (i, a) in assignments.iter().enumerate() {
            prop_assert!(!engine.leave().is_on_approved_leave(&a.staff_id, a.date));
            for b in &assignments[i + 1..] {
                if a.staff_id == b.staff_id {
                    let (start, end) = b.window();
                    prop_assert!(!a.overlaps(start, end));
                }
            }
        }
    }
}
