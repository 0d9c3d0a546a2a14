mod common;
use common::*;

use sungrow_bridge::prelude::*;

const TOTAL_ENERGY: u16 = 21299;
const ACTIVE_POWER: u16 = 21307;
const CHARGED_ENERGY: u16 = 21309;

#[tokio::test]
async fn energies_are_reported_in_kwh() {
    common_setup();

    let conn = MockConnection::new();
    conn.set_input_u32_swapped(TOTAL_ENERGY, 12345);
    conn.set_input_u32_swapped(CHARGED_ENERGY, 12345);
    let subject = Factory::sungrow(&conn);

    assert_eq!(subject.total_energy().await.unwrap(), 12.345);
    assert_eq!(subject.charged_energy().await.unwrap(), 12.345);

    assert_eq!(
        conn.ops(),
        vec![Op::ReadInput(TOTAL_ENERGY, 2), Op::ReadInput(CHARGED_ENERGY, 2)]
    );
}

#[tokio::test]
async fn power_uses_both_words() {
    common_setup();

    let conn = MockConnection::new();
    // 70000 W does not fit in the low word
    conn.set_input_u32_swapped(ACTIVE_POWER, 70_000);
    let subject = Factory::sungrow(&conn);

    assert_eq!(subject.current_power().await.unwrap(), 70_000.0);
    assert_eq!(conn.ops(), vec![Op::ReadInput(ACTIVE_POWER, 2)]);
}

#[tokio::test]
async fn every_read_is_a_fresh_transaction() {
    common_setup();

    let conn = MockConnection::new();
    let subject = Factory::sungrow(&conn);

    conn.set_input_u32_swapped(ACTIVE_POWER, 3680);
    assert_eq!(subject.current_power().await.unwrap(), 3680.0);

    conn.set_input_u32_swapped(ACTIVE_POWER, 11040);
    assert_eq!(subject.current_power().await.unwrap(), 11040.0);

    assert_eq!(conn.ops().len(), 2);
}

#[tokio::test]
async fn phase_values_in_declaration_order() {
    common_setup();

    let conn = MockConnection::new();
    for (address, value) in [
        (21301, 2301),
        (21302, 160),
        (21303, 2295),
        (21304, 158),
        (21305, 2310),
        (21306, 155),
    ] {
        conn.set_input(address, value);
    }
    let subject = Factory::sungrow(&conn);

    assert_eq!(subject.currents().await.unwrap(), (16.0, 15.8, 15.5));
    assert_eq!(subject.voltages().await.unwrap(), (230.1, 229.5, 231.0));

    assert_eq!(
        conn.ops(),
        vec![
            Op::ReadInput(21302, 1),
            Op::ReadInput(21304, 1),
            Op::ReadInput(21306, 1),
            Op::ReadInput(21301, 1),
            Op::ReadInput(21303, 1),
            Op::ReadInput(21305, 1),
        ]
    );
}

#[tokio::test]
async fn failing_phase_aborts_the_triple() {
    common_setup();

    let conn = MockConnection::new();
    conn.set_input(21302, 160);
    conn.set_input(21306, 155);
    conn.fail(21304);
    let subject = Factory::sungrow(&conn);

    let err = subject.currents().await.unwrap_err();
    assert!(err.is_transport());

    // L3 is never attempted once L2 fails
    assert_eq!(
        conn.ops(),
        vec![Op::ReadInput(21302, 1), Op::ReadInput(21304, 1)]
    );
}
