//! Blocking playback of synthesized MP3 files.
//!
//! With the `playback` feature the file is decoded with symphonia and played
//! on the default output device through cpal. Otherwise an external player
//! command is run and waited on.

use crate::error::AudioError;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AudioPlayer {
    #[cfg_attr(feature = "playback", allow(dead_code))]
    command: Vec<String>,
}

impl AudioPlayer {
    /// `command` is the external player and its leading arguments.
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// Returns once playback has finished.
    pub fn play_file(&self, path: &Path) -> Result<(), AudioError> {
        if !path.exists() {
            return Err(AudioError::Missing(path.display().to_string()));
        }
        debug!("Playing audio file '{}'", path.display());
        self.play_blocking(path)?;
        debug!("Finished playing audio file '{}'", path.display());
        Ok(())
    }

    #[cfg(not(feature = "playback"))]
    fn play_blocking(&self, path: &Path) -> Result<(), AudioError> {
        use std::process::{Command, Stdio};

        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| AudioError::Playback("no audio player configured".to_string()))?;

        let status = Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| AudioError::Playback(format!("could not run '{}': {}", program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(AudioError::Playback(format!("'{}' exited with {}", program, status)))
        }
    }

    #[cfg(feature = "playback")]
    fn play_blocking(&self, path: &Path) -> Result<(), AudioError> {
        let clip = native::decode_file(path)?;
        native::play_clip(&clip)
    }
}

#[cfg(feature = "playback")]
mod native {
    use crate::error::AudioError;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{FromSample, Sample, SampleFormat, SizedSample, StreamConfig};
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;
    use tracing::warn;

    /// Interleaved f32 samples
    pub struct Clip {
        pub samples: Vec<f32>,
        pub sample_rate: u32,
        pub channels: usize,
    }

    pub fn decode_file(path: &Path) -> Result<Clip, AudioError> {
        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("mp3");

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AudioError::Playback(format!("Failed to probe format: {}", e)))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::Playback("No audio track found".to_string()))?;
        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AudioError::Playback("Sample rate not found".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Playback(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();
        let mut channels = 1;
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    warn!("Error reading packet: {}", e);
                    break;
                }
            };
            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    channels = decoded.spec().channels.count();
                    let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
                Err(e) => {
                    warn!("Decode error: {}", e);
                    continue;
                }
            }
        }

        Ok(Clip {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Linear resample and channel remap to the device layout.
    fn convert(clip: &Clip, out_rate: u32, out_channels: usize) -> Vec<f32> {
        let in_frames = clip.samples.len() / clip.channels.max(1);
        if in_frames == 0 {
            return Vec::new();
        }
        let ratio = clip.sample_rate as f64 / out_rate as f64;
        let out_frames = (in_frames as f64 / ratio) as usize;
        let mut out = Vec::with_capacity(out_frames * out_channels);

        for frame in 0..out_frames {
            let pos = frame as f64 * ratio;
            let i = pos as usize;
            let frac = (pos - i as f64) as f32;
            let next = (i + 1).min(in_frames - 1);
            for ch in 0..out_channels {
                let src_ch = ch.min(clip.channels - 1);
                let a = clip.samples[i * clip.channels + src_ch];
                let b = clip.samples[next * clip.channels + src_ch];
                out.push(a + (b - a) * frac);
            }
        }
        out
    }

    pub fn play_clip(clip: &Clip) -> Result<(), AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Playback("No output device available".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.config();

        let samples = Arc::new(convert(clip, config.sample_rate.0, config.channels as usize));
        let done = Arc::new(AtomicBool::new(samples.is_empty()));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, samples, done.clone()),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, samples, done.clone()),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, samples, done.clone()),
            other => {
                return Err(AudioError::Playback(format!(
                    "Unsupported sample format {:?}",
                    other
                )));
            }
        }?;
        stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        while !done.load(Ordering::Acquire) {
            std::thread::sleep(Duration::from_millis(20));
        }
        // let the device drain its last buffer
        std::thread::sleep(Duration::from_millis(100));
        Ok(())
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        samples: Arc<Vec<f32>>,
        done: Arc<AtomicBool>,
    ) -> Result<cpal::Stream, AudioError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let position = AtomicUsize::new(0);
        let error_done = done.clone();
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let start = position.load(Ordering::Relaxed);
                    for (i, out) in data.iter_mut().enumerate() {
                        let sample = samples.get(start + i).copied().unwrap_or(0.0);
                        *out = T::from_sample(sample);
                    }
                    let end = start + data.len();
                    position.store(end, Ordering::Relaxed);
                    if end >= samples.len() {
                        done.store(true, Ordering::Release);
                    }
                },
                move |err| {
                    warn!("Audio stream error: {}", err);
                    error_done.store(true, Ordering::Release);
                },
                None,
            )
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}

#[cfg(all(test, not(feature = "playback")))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let player = AudioPlayer::new(vec!["true".to_string()]);
        let result = player.play_file(Path::new("/definitely/not/here.mp3"));
        assert!(matches!(result, Err(AudioError::Missing(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_player_exit_status() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let ok = AudioPlayer::new(vec!["true".to_string()]);
        assert!(ok.play_file(file.path()).is_ok());

        let failing = AudioPlayer::new(vec!["false".to_string()]);
        assert!(matches!(
            failing.play_file(file.path()),
            Err(AudioError::Playback(_))
        ));
    }

    #[test]
    fn test_unknown_player_program() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let player = AudioPlayer::new(vec!["no-such-player-binary-xyz".to_string()]);
        assert!(matches!(
            player.play_file(file.path()),
            Err(AudioError::Playback(_))
        ));
    }

    #[test]
    fn test_empty_command() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let player = AudioPlayer::new(Vec::new());
        assert!(matches!(
            player.play_file(file.path()),
            Err(AudioError::Playback(_))
        ));
    }
}
