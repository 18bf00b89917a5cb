use askwave_core::bits::{bits_to_bytes, parse_bits};
use askwave_core::{
    AudioSink, EnvelopeDemodulator, FrameDecoder, FrameSyncError, LinkConfig, Loopback,
    ModemError, ModulationConfig, Receiver, Synthesizer, ThresholdPolicy, Transmitter,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixed_threshold_config() -> LinkConfig {
    // Between amplitude_low (0.0) and amplitude_high * 0.5 (0.6)
    LinkConfig {
        threshold: ThresholdPolicy::Fixed(0.5),
        ..LinkConfig::default()
    }
}

fn round_trip(config: LinkConfig, payload: &[bool]) -> Vec<Vec<bool>> {
    let tx = Transmitter::new(config).expect("Failed to create transmitter");
    let rx = Receiver::new(config).expect("Failed to create receiver");

    let samples = tx.transmit(&[payload]).expect("Failed to transmit");
    let report = rx.receive(&samples).expect("Failed to receive");
    report.payloads().map(|p| p.to_vec()).collect()
}

#[test]
fn test_round_trip_fixed_threshold() {
    init_logging();
    for pattern in ["00000000", "11111111", "10101010", "01010101", "11000011"] {
        let payload = parse_bits(pattern).unwrap();
        let decoded = round_trip(fixed_threshold_config(), &payload);
        assert_eq!(decoded, vec![payload], "Round trip failed for {}", pattern);
    }
}

#[test]
fn test_round_trip_peak_fraction_threshold() {
    init_logging();
    for pattern in ["00000000", "11111111", "10101010"] {
        let payload = parse_bits(pattern).unwrap();
        let decoded = round_trip(LinkConfig::default(), &payload);
        assert_eq!(decoded, vec![payload], "Round trip failed for {}", pattern);
    }
}

#[test]
fn test_round_trip_without_idle_gap() {
    // A lone frame still ends on its high stop bit
    let config = LinkConfig {
        idle_gap_duration: 0.0,
        ..fixed_threshold_config()
    };
    let payload = parse_bits("10101010").unwrap();
    assert_eq!(round_trip(config, &payload), vec![payload]);
}

#[test]
fn test_frame_length_invariant() {
    let config = LinkConfig {
        idle_gap_duration: 0.0,
        ..LinkConfig::default()
    };
    let tx = Transmitter::new(config).unwrap();
    for len in [1usize, 8, 16] {
        let config = LinkConfig {
            payload_length: len,
            ..config
        };
        let tx_len = Transmitter::new(config).unwrap();
        let samples = tx_len.transmit(&[vec![true; len]]).unwrap();
        let expected = ((len + 2) as f64 * 0.1 * 44100.0).round() as usize;
        assert_eq!(samples.len(), expected, "payload length {}", len);
    }
    assert_eq!(tx.frame_samples(&[false; 8]).unwrap().len(), 44100);
}

#[test]
fn test_multi_frame_ordering_with_idle_gap() {
    init_logging();
    let config = fixed_threshold_config();
    let tx = Transmitter::new(config).unwrap();
    let rx = Receiver::new(config).unwrap();

    let a = parse_bits("10101010").unwrap();
    let b = parse_bits("00001111").unwrap();
    let samples = tx.transmit(&[a.clone(), b.clone()]).unwrap();

    let report = rx.receive(&samples).unwrap();
    let payloads: Vec<Vec<bool>> = report.payloads().map(|p| p.to_vec()).collect();
    assert_eq!(payloads, vec![a, b]);
    assert!(report.sync_errors.is_empty());
    assert!(report.truncated.is_none());
    // 2 * (10 frame bits + 5 idle bits)
    assert_eq!(report.bit_count, 30);
}

#[test]
fn test_multi_frame_ordering_with_uneven_idle_gap() {
    init_logging();
    let a = parse_bits("10101010").unwrap();
    let b = parse_bits("11001100").unwrap();

    // None of these are a whole number of 0.1 s bit periods
    for gap in [0.15, 0.25, 0.55] {
        let config = LinkConfig {
            idle_gap_duration: gap,
            ..LinkConfig::default()
        };
        let tx = Transmitter::new(config).unwrap();
        let rx = Receiver::new(config).unwrap();

        let samples = tx.transmit(&[a.clone(), b.clone()]).unwrap();
        let report = rx.receive(&samples).unwrap();
        let payloads: Vec<Vec<bool>> = report.payloads().map(|p| p.to_vec()).collect();
        assert_eq!(payloads, vec![a.clone(), b.clone()], "idle gap {}", gap);
        assert!(report.sync_errors.is_empty(), "idle gap {}: {:?}", gap, report.sync_errors);
        assert!(report.truncated.is_none());
    }
}

#[test]
fn test_repeated_transmission() {
    let config = LinkConfig {
        frame_repeat_count: 5,
        ..LinkConfig::default()
    };
    let tx = Transmitter::new(config).unwrap();
    let rx = Receiver::new(config).unwrap();

    let payload = parse_bits("10101010").unwrap();
    let samples = tx.transmit_repeated(&payload).unwrap();
    let report = rx.receive(&samples).unwrap();

    assert_eq!(report.frames.len(), 5);
    assert!(report.payloads().all(|p| p == payload.as_slice()));
}

#[test]
fn test_byte_message_round_trip() {
    let config = LinkConfig::default();
    let tx = Transmitter::new(config).unwrap();
    let rx = Receiver::new(config).unwrap();

    let message = b"Hi!";
    let samples = tx.transmit_bytes(message).unwrap();
    let report = rx.receive(&samples).unwrap();

    let bits: Vec<bool> = report.payloads().flatten().copied().collect();
    assert_eq!(bits_to_bytes(&bits), message.to_vec());
}

#[test]
fn test_round_trip_with_gaussian_noise() {
    init_logging();
    let config = LinkConfig::default();
    let tx = Transmitter::new(config).unwrap();
    let rx = Receiver::new(config).unwrap();

    let a = parse_bits("10110010").unwrap();
    let b = parse_bits("01101101").unwrap();
    let mut samples = tx.transmit(&[a.clone(), b.clone()]).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0f32, 0.05).unwrap();
    for sample in samples.iter_mut() {
        *sample += noise.sample(&mut rng);
    }

    let report = rx.receive(&samples).unwrap();
    let payloads: Vec<Vec<bool>> = report.payloads().map(|p| p.to_vec()).collect();
    assert_eq!(payloads, vec![a, b]);
}

#[test]
fn test_loopback_capture_with_trailing_silence() {
    let config = LinkConfig::default();
    let tx = Transmitter::new(config).unwrap();
    let rx = Receiver::new(config).unwrap();

    let payload = parse_bits("11100100").unwrap();
    let samples = tx.transmit(&[payload.clone()]).unwrap();

    let mut loopback = Loopback::new();
    loopback.play(&samples, 44100).unwrap();

    // 1.5 s played, 2.0 s recorded: the silent tail reads as an unfinished frame
    let report = rx.capture(&mut loopback, 2.0).unwrap();
    assert_eq!(report.frames.len(), 1);
    assert_eq!(report.frames[0].payload, payload);
    assert_eq!(report.truncated.map(|t| t.bit_index), Some(15));
}

#[test]
fn test_loopback_capture_with_misaligned_start() {
    let config = fixed_threshold_config();
    let tx = Transmitter::new(config).unwrap();
    let rx = Receiver::new(config).unwrap();

    let payload = parse_bits("10011010").unwrap();
    let samples = tx.transmit(&[payload.clone()]).unwrap();

    // Recording starts 1000 samples (under a quarter bit) before playback
    let mut loopback = Loopback::new().with_lead_in(1000);
    loopback.play(&samples, 44100).unwrap();
    let duration = (samples.len() + 1000) as f64 / 44100.0;

    let report = rx.capture(&mut loopback, duration).unwrap();
    assert_eq!(report.frames.len(), 1);
    assert_eq!(report.frames[0].payload, payload);
}

#[test]
fn test_silent_capture_is_an_error() {
    let rx = Receiver::new(LinkConfig::default()).unwrap();
    let mut loopback = Loopback::new();
    match rx.capture(&mut loopback, 1.0) {
        Err(ModemError::SilentBuffer) => {}
        other => panic!("Expected SilentBuffer, got {:?}", other),
    }
}

#[test]
fn test_receiver_with_mismatched_payload_length() {
    // A receiver expecting 16-bit payloads runs out of input before it can
    // see a stop bit for an 8-bit frame followed by a 5-bit idle gap.
    let tx = Transmitter::new(LinkConfig::default()).unwrap();
    let rx = Receiver::new(LinkConfig {
        payload_length: 16,
        ..LinkConfig::default()
    })
    .unwrap();

    let payload = parse_bits("10101010").unwrap();
    let samples = tx.transmit(&[payload]).unwrap();
    match rx.receive(&samples) {
        Err(ModemError::NoFramesDecoded {
            sync_errors: 0,
            truncated: true,
        }) => {}
        other => panic!("Expected NoFramesDecoded, got {:?}", other),
    }
}

#[test]
fn test_resync_over_the_air() {
    init_logging();
    let synth = Synthesizer::new(ModulationConfig::default()).unwrap();
    let demod = EnvelopeDemodulator::new(ThresholdPolicy::default()).unwrap();
    let decoder = FrameDecoder::new(4410, 8).unwrap();

    // Valid frame, idle, a frame whose stop bit is overwritten by the next
    // start bit, then a valid frame.
    let stream = parse_bits("0 10101010 1 11111 0 11111111 0 00110011 1 11111").unwrap();
    let samples = synth.synthesize(&stream);

    let binary = demod.demodulate(&samples).unwrap();
    assert_eq!(binary.len(), samples.len());

    let report = decoder.decode(&binary).unwrap();
    let payloads: Vec<Vec<bool>> = report.payloads().map(|p| p.to_vec()).collect();
    assert_eq!(
        payloads,
        vec![
            parse_bits("10101010").unwrap(),
            parse_bits("00110011").unwrap()
        ]
    );
    assert_eq!(report.sync_errors, vec![FrameSyncError { bit_index: 15 }]);
}
