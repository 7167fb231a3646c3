use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use i2clcd::recording::Transfer;
use i2clcd::{BusEvent, CharSize, DisplayConfig, Pcf8574Lcd, Recorder, TransportError};

const ADDRESS: u8 = 0x27;
const BACKLIGHT: u8 = 0x08;

fn write(data: u8) -> BusEvent {
    BusEvent::Write { address: ADDRESS, data }
}

/// Events produced by latching one nibble (already merged with RS) with the backlight on.
fn nibble(value: u8) -> Vec<BusEvent> {
    let value = value | BACKLIGHT;
    vec![
        write(value),
        write(value | 0x04),
        BusEvent::Delay(1),
        write(value & !0x04),
        BusEvent::Delay(50),
    ]
}

fn command(value: u8) -> Vec<BusEvent> {
    let mut events = nibble(value & 0xF0);
    events.extend(nibble(value << 4));
    events
}

fn lcd_16x2() -> (Pcf8574Lcd<Recorder, Recorder>, Recorder) {
    let recorder = Recorder::new();
    let config = DisplayConfig::new(ADDRESS, 16, 2, CharSize::Dots5x8).unwrap();
    let lcd = Pcf8574Lcd::new(config, recorder.clone(), recorder.clone()).unwrap();
    (lcd, recorder)
}

#[test]
fn begin_emits_power_up_sequence() {
    let (mut lcd, recorder) = lcd_16x2();
    lcd.begin().unwrap();

    let mut expected = vec![
        BusEvent::Delay(50_000),
        write(BACKLIGHT),
        BusEvent::Delay(1_000_000),
    ];
    expected.extend(nibble(0x30));
    expected.push(BusEvent::Delay(4500));
    expected.extend(nibble(0x30));
    expected.push(BusEvent::Delay(4500));
    expected.extend(nibble(0x30));
    expected.push(BusEvent::Delay(150));
    expected.extend(nibble(0x20));
    // function set: 4-bit, 2 lines, 5x8
    expected.extend(command(0x28));
    // display on, no cursor, no blink
    expected.extend(command(0x0C));
    expected.extend(command(0x01));
    expected.push(BusEvent::Delay(2000));
    // left to right, no autoscroll
    expected.extend(command(0x06));
    expected.extend(command(0x02));
    expected.push(BusEvent::Delay(2000));

    assert_eq!(recorder.events(), expected);
}

#[test]
fn begin_reads_back_as_classic_init_bytes() {
    let (mut lcd, recorder) = lcd_16x2();
    lcd.begin().unwrap();

    // The four reset nibbles pair up as 0x33 0x32.
    assert_eq!(
        recorder.transfers(),
        vec![
            Transfer::Command(0x33),
            Transfer::Command(0x32),
            Transfer::Command(0x28),
            Transfer::Command(0x0C),
            Transfer::Command(0x01),
            Transfer::Command(0x06),
            Transfer::Command(0x02),
        ]
    );
    assert!(lcd.control_flags().display());
    assert!(!lcd.control_flags().cursor());
    assert!(!lcd.control_flags().blink());
    assert!(lcd.entry_mode_flags().left_to_right());
    assert!(!lcd.entry_mode_flags().autoscroll());
}

#[test]
fn begin_single_line_tall_font() {
    let recorder = Recorder::new();
    let config = DisplayConfig::new(ADDRESS, 16, 1, CharSize::Dots5x10).unwrap();
    let mut lcd = Pcf8574Lcd::new(config, recorder.clone(), recorder.clone()).unwrap();
    lcd.begin().unwrap();

    assert_eq!(recorder.transfers()[2], Transfer::Command(0x24));
}

#[test]
fn failure_during_reset_aborts_begin() {
    let (mut lcd, recorder) = lcd_16x2();
    // Write 0 is the backlight-only write, 1 is the first reset nibble
    recorder.fail_write(1, ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));

    assert_eq!(lcd.begin(), Err(TransportError::Nack));
    assert_eq!(
        recorder.events(),
        vec![
            BusEvent::Delay(50_000),
            write(BACKLIGHT),
            BusEvent::Delay(1_000_000),
        ]
    );
}

#[test]
fn failure_mid_reset_sends_nothing_after() {
    let (mut lcd, recorder) = lcd_16x2();
    // Enable-high write of the second reset nibble
    recorder.fail_write(5, ErrorKind::Bus);

    assert_eq!(lcd.begin(), Err(TransportError::Bus(ErrorKind::Bus)));
    assert_eq!(recorder.writes().len(), 5);
    assert_eq!(recorder.latched(), vec![0x3C]);
}

#[test]
fn begin_can_be_rerun_after_failure() {
    let (mut lcd, recorder) = lcd_16x2();
    recorder.fail_write(20, ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
    assert!(lcd.begin().is_err());

    recorder.clear();
    lcd.begin().unwrap();
    assert_eq!(recorder.transfers().len(), 7);
}
