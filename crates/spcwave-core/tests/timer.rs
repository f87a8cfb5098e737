use spcwave_core::timer::{TIMER_01_PERIOD, TIMER_2_PERIOD, Timer};

#[test]
fn ticks_once_per_period_times_divisor() {
    let mut t = Timer::new(TIMER_01_PERIOD);
    t.enable(1, 0);
    t.tick(255);
    assert_eq!(t.read_counter(), 0);
    t.tick(256);
    assert_eq!(t.read_counter(), 1);
}

#[test]
fn counter_read_clears_and_stays_cleared() {
    let mut t = Timer::new(TIMER_01_PERIOD);
    t.enable(1, 0);
    t.tick(3 * 256);
    assert_eq!(t.read_counter(), 3);
    // No tick in between: second read observes the cleared value.
    assert_eq!(t.read_counter(), 0);
}

#[test]
fn divisor_zero_means_256() {
    let mut t = Timer::new(TIMER_01_PERIOD);
    t.enable(0, 0);
    t.tick(256 * 255);
    assert_eq!(t.read_counter(), 0);
    t.tick(256 * 256);
    assert_eq!(t.read_counter(), 1);
}

#[test]
fn fast_timer_ticks_at_64khz() {
    let mut t = Timer::new(TIMER_2_PERIOD);
    t.enable(1, 0);
    t.tick(32);
    assert_eq!(t.read_counter(), 1);
    t.tick(32 * 10);
    assert_eq!(t.read_counter(), 9);
}

#[test]
fn output_counter_wraps_modulo_16() {
    let mut t = Timer::new(TIMER_01_PERIOD);
    t.enable(1, 0);
    t.tick(256 * 16);
    assert_eq!(t.read_counter(), 0);
    t.tick(256 * 17);
    assert_eq!(t.read_counter(), 1);
}

#[test]
fn disable_resets_all_state() {
    let mut t = Timer::new(TIMER_01_PERIOD);
    t.enable(5, 0);
    t.tick(256 * 12);
    t.disable();
    assert!(!t.enabled());
    assert_eq!(t.read_counter(), 0);
    // Ticking while disabled does nothing.
    t.tick(256 * 64);
    assert_eq!(t.read_counter(), 0);
}

#[test]
fn enable_phases_off_the_current_cycle() {
    let mut t = Timer::new(TIMER_01_PERIOD);
    t.enable(1, 1000);
    t.tick(1255);
    assert_eq!(t.read_counter(), 0);
    t.tick(1256);
    assert_eq!(t.read_counter(), 1);
}

#[test]
fn reenable_relatches_divisor() {
    let mut t = Timer::new(TIMER_01_PERIOD);
    t.enable(2, 0);
    t.tick(256 * 2);
    assert_eq!(t.read_counter(), 1);
    t.disable();
    t.enable(4, 256 * 2);
    t.tick(256 * 2 + 256 * 4);
    assert_eq!(t.read_counter(), 1);
}
