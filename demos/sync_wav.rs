//! Example: Align two WAV files
//!
//! Builds a signature for each file and prints the offset segments mapping
//! positions of the first file into the second.
//!
//! ```text
//! cargo run --example sync_wav -- original.wav edited.wav
//! ```

use tracksync_dsp::signature::DEFAULT_SAMPLES_PER_SECOND;
use tracksync_dsp::{align_signatures, AlignmentConfig, Signature};

/// Read a WAV file and downmix it to mono 16-bit PCM
fn read_mono(path: &str) -> Result<(Vec<i16>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int if spec.bits_per_sample <= 16 => {
            reader.samples::<i16>().collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Int => {
            let shift = spec.bits_per_sample - 16;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v >> shift) as i16))
                .collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<Result<_, _>>()?,
    };

    let mono = interleaved
        .chunks(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect();
    Ok((mono, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <track_a.wav> <track_b.wav>", args[0]);
        std::process::exit(1);
    }

    let mut signatures = Vec::with_capacity(2);
    for path in &args[1..] {
        let (pcm, rate) = read_mono(path)?;
        println!("{}: {} samples at {} Hz", path, pcm.len(), rate);
        signatures.push(Signature::from_pcm(&pcm, rate, DEFAULT_SAMPLES_PER_SECOND)?);
    }

    let mut result = align_signatures(&signatures[0], &signatures[1], &AlignmentConfig::default())?;

    println!("Alignment Results:");
    println!("  Matches: {}", result.metadata.match_count);
    println!(
        "  Coverage: A {:.1}%, B {:.1}%",
        result.metadata.coverage_a * 100.0,
        result.metadata.coverage_b * 100.0
    );
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    for segment in result.offsets.iter() {
        let range = format!(
            "{:9.3}s - {:9.3}s",
            segment.start_time.as_seconds_f64(),
            segment.end_time.as_seconds_f64()
        );
        match segment.offset {
            Some(offset) => println!("  {}  {:+.3}s", range, offset.as_seconds_f64()),
            None => println!("  {}  unmapped", range),
        }
    }

    if !result.is_correlated() {
        println!("  Tracks do not correlate");
    } else if let Some(moved) = result.offsets.transform_position(time::Duration::ZERO) {
        println!("  Start of A is at {:.3}s in B", moved.as_seconds_f64());
    }

    Ok(())
}
