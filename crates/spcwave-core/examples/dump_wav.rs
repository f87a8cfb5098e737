use std::env;
use std::fs;
use std::path::Path;

use spcwave_core::{SAMPLE_RATE, apu::Apu, snapshot::Snapshot};

const DEFAULT_SECONDS: f64 = 30.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let spc_path = args
        .next()
        .ok_or("expected <snapshot.spc> <output wav> [--seconds=N]")?;
    let out_path = args
        .next()
        .ok_or("expected <snapshot.spc> <output wav> [--seconds=N]")?;

    let mut seconds = DEFAULT_SECONDS;
    for arg in args {
        if let Some(value) = arg.strip_prefix("--seconds=") {
            seconds = value.parse()?;
        } else {
            return Err(format!("unrecognised flag: {arg}").into());
        }
    }
    if seconds <= 0.0 {
        return Err("seconds must be positive".into());
    }

    let snapshot = Snapshot::from_file(&spc_path)?;
    if let Some(tag) = &snapshot.tag {
        println!("{} - {}", tag.game_title, tag.song_title);
    }

    let mut apu = Apu::from_snapshot(&snapshot);
    let consumer = apu.attach_sink(4096);

    let total_frames = (seconds * SAMPLE_RATE as f64).ceil() as u64;

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let out = Path::new(&out_path);
    if let Some(parent) = out
        .parent()
        .and_then(|p| (!p.as_os_str().is_empty()).then_some(p))
    {
        fs::create_dir_all(parent)?;
    }
    let mut writer = hound::WavWriter::create(out, spec)?;

    let mut frames_written = 0u64;
    while frames_written < total_frames {
        apu.step_instruction()?;
        while frames_written < total_frames {
            let Some((left, right)) = consumer.pop_frame() else {
                break;
            };
            writer.write_sample(left)?;
            writer.write_sample(right)?;
            frames_written += 1;
        }
    }

    writer.finalize()?;
    println!(
        "wrote {frames_written} stereo frames ({seconds:.2}s) to {}",
        out.display()
    );

    Ok(())
}
