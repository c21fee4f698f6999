//! An example showcasing how to apply the echo effect to a wav file offline: the file is
//! processed chunk by chunk, as a player would do it, and written back with the echo tail
//! appended.

use std::env;

use byteorder::{ByteOrder, LittleEndian};

use specho::{EchoEffect, EchoParameter, SampleFormat};

// -------------------------------------------------------------------------------------------------

#[cfg(all(debug_assertions, feature = "assert-allocs"))]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

// -------------------------------------------------------------------------------------------------

const DEFAULT_LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Warn
};

const CHUNK_FRAMES: usize = 1024;

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Init logger
    simple_logger::SimpleLogger::new()
        .with_level(DEFAULT_LOG_LEVEL.to_level_filter())
        .init()
        .expect("Failed to set logger");

    // Parse arguments
    let mut args = env::args().skip(1);
    let (input_path, output_path) = match (args.next(), args.next()) {
        (Some(input_path), Some(output_path)) => (input_path, output_path),
        _ => {
            eprintln!("Usage: wav-echo INPUT_WAV OUTPUT_WAV [DELAY_LENGTH]");
            eprintln!("DELAY_LENGTH selects the echo window in 16 ms steps, in range 0-15.");
            return Ok(());
        }
    };
    let delay_length = match args.next() {
        Some(value) => value.parse::<u8>()?.min(0x0F),
        None => 0x05,
    };

    // Read the input file into interleaved 16 bit samples
    let mut reader = hound::WavReader::open(&input_path)?;
    let spec = reader.spec();
    let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader.samples::<i16>().collect::<Result<_, _>>()?,
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|sample| sample.map(|value| (value.clamp(-1.0, 1.0) * 32767.0) as i16))
            .collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(format!("Unsupported wav sample format: {bits} bit {format:?}").into());
        }
    };
    let mut bytes = vec![0_u8; samples.len() * 2];
    LittleEndian::write_i16_into(&samples, &mut bytes);

    // Create an echo effect for the file's stream properties
    let mut effect = EchoEffect::new(
        spec.sample_rate,
        SampleFormat::S16Le,
        usize::from(spec.channels),
    )?;
    effect.set_parameter(EchoParameter::DelayLength, delay_length);

    // Run the effect over the file in player sized chunks
    let chunk_bytes = CHUNK_FRAMES * effect.frame_bytes();
    for chunk in bytes.chunks_mut(chunk_bytes) {
        effect.process(chunk);
    }

    // Keep feeding silence for two more circulations, so the echo tail rings out
    let mut tail = vec![0_u8; 2 * effect.tail_frames() * effect.frame_bytes()];
    for chunk in tail.chunks_mut(chunk_bytes) {
        effect.process(chunk);
    }

    // Write processed samples and tail back as 16 bit wav file
    let mut writer = hound::WavWriter::create(
        &output_path,
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        },
    )?;
    for sample_bytes in bytes.chunks_exact(2).chain(tail.chunks_exact(2)) {
        writer.write_sample(LittleEndian::read_i16(sample_bytes))?;
    }
    writer.finalize()?;

    println!(
        "Wrote '{output_path}': {} Hz, {} channels, delay length {delay_length}",
        spec.sample_rate, spec.channels
    );
    Ok(())
}
