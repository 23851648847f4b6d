//! Real-time duplex streaming through the feedback delay via cpal.
//!
//! The output callback owns the [`FeedbackDelay`]. It takes one
//! [`SharedParams::snapshot`] per device buffer, so control changes made
//! from other threads land on buffer boundaries.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, Stream};
use crossbeam_channel::{Receiver, Sender, bounded};
use ekko_core::{FeedbackDelay, SharedParams};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Capacity of the input-to-output hand-off queue, in frames.
const QUEUE_FRAMES: usize = 8192;

/// Creates the bounded input hand-off for `channels`-wide interleaved audio.
///
/// Storage for `frames * channels` samples is allocated here, once. The
/// producer side lives in the input callback and the consumer side in the
/// output callback.
fn input_queue(frames: usize, channels: usize) -> (InputProducer, InputConsumer) {
    let channels = channels.max(1);
    let capacity = frames * channels;
    let (tx, rx) = bounded::<f32>(capacity);
    (
        InputProducer {
            tx,
            channels,
            capacity,
        },
        InputConsumer { rx },
    )
}

/// Input-callback half of the hand-off queue.
struct InputProducer {
    tx: Sender<f32>,
    channels: usize,
    capacity: usize,
}

impl InputProducer {
    /// Queues every whole frame of `data` that fits; frames arriving while
    /// the queue is full are dropped. Returns the number of frames dropped.
    fn push(&self, data: &[f32]) -> usize {
        let mut dropped = 0;
        for frame in data.chunks_exact(self.channels) {
            // Only this side grows the queue, so the room check holds
            if self.tx.len() + self.channels > self.capacity {
                dropped += 1;
                continue;
            }
            for &sample in frame {
                let _ = self.tx.try_send(sample);
            }
        }
        dropped
    }
}

/// Output-callback half of the hand-off queue.
struct InputConsumer {
    rx: Receiver<f32>,
}

impl InputConsumer {
    /// Samples currently queued.
    fn len(&self) -> usize {
        self.rx.len()
    }

    /// Fills `out` from the queue if enough samples are waiting. Leaves the
    /// queue untouched and returns `false` otherwise.
    fn pop_into(&self, out: &mut [f32]) -> bool {
        if self.len() < out.len() {
            return false;
        }
        for sample in out.iter_mut() {
            *sample = self.rx.try_recv().unwrap_or(0.0);
        }
        true
    }
}

fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether the device supports audio input.
    pub is_input: bool,
    /// Whether the device supports audio output.
    pub is_output: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

/// Device selection for an [`AudioStream`].
///
/// Names may be an index (`"0"`), an exact device name, or a
/// case-insensitive fragment of one. `None` picks the host default.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Input device name or index.
    pub input_device: Option<String>,
    /// Output device name or index.
    pub output_device: Option<String>,
}

/// List all available audio devices.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(inputs) = host.input_devices() {
        for device in inputs {
            if let Ok(name) = device_name(&device) {
                devices.push(AudioDevice {
                    name,
                    is_input: true,
                    is_output: device.default_output_config().is_ok(),
                    default_sample_rate: device
                        .default_input_config()
                        .map(|c| c.sample_rate())
                        .unwrap_or(48000),
                });
            }
        }
    }

    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            let Ok(name) = device_name(&device) else {
                continue;
            };
            // Duplex devices were already listed as inputs
            if devices.iter().any(|d| d.name == name) {
                continue;
            }
            devices.push(AudioDevice {
                name,
                is_input: false,
                is_output: true,
                default_sample_rate: device
                    .default_output_config()
                    .map(|c| c.sample_rate())
                    .unwrap_or(48000),
            });
        }
    }

    Ok(devices)
}

/// Default input and output devices, if the host has them.
pub fn default_device() -> Result<(Option<AudioDevice>, Option<AudioDevice>)> {
    let host = cpal::default_host();

    let describe = |device: Device, is_input: bool| {
        let config = if is_input {
            device.default_input_config()
        } else {
            device.default_output_config()
        };
        device_name(&device).ok().map(|name| AudioDevice {
            name,
            is_input,
            is_output: !is_input,
            default_sample_rate: config.map(|c| c.sample_rate()).unwrap_or(48000),
        })
    };

    let input = host.default_input_device().and_then(|d| describe(d, true));
    let output = host.default_output_device().and_then(|d| describe(d, false));

    Ok((input, output))
}

/// Live input-to-output stream running a [`FeedbackDelay`].
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ekko_core::{ControlParams, FeedbackDelay, SharedParams};
/// use ekko_io::{AudioStream, StreamConfig};
///
/// let params = Arc::new(SharedParams::new(ControlParams::default()));
/// let mut stream = AudioStream::new(StreamConfig::default()).unwrap();
///
/// let stop = stream.running_flag();
/// std::thread::spawn(move || {
///     std::thread::sleep(std::time::Duration::from_secs(5));
///     stop.store(false, std::sync::atomic::Ordering::SeqCst);
/// });
///
/// stream.run(FeedbackDelay::default(), params).unwrap();
/// ```
pub struct AudioStream {
    input_device: Device,
    output_device: Device,
    running: Arc<AtomicBool>,
    _input_stream: Option<Stream>,
    _output_stream: Option<Stream>,
}

impl AudioStream {
    /// Open the configured devices. Nothing plays until [`run`](Self::run).
    pub fn new(config: StreamConfig) -> Result<Self> {
        let host = cpal::default_host();

        let input_device = match &config.input_device {
            Some(name) => find_device(&host, name, true)?,
            None => host.default_input_device().ok_or(Error::NoDevice)?,
        };

        let output_device = match &config.output_device {
            Some(name) => find_device(&host, name, false)?,
            None => host.default_output_device().ok_or(Error::NoDevice)?,
        };

        Ok(Self {
            input_device,
            output_device,
            running: Arc::new(AtomicBool::new(false)),
            _input_stream: None,
            _output_stream: None,
        })
    }

    /// Output device sample rate; the delay is prepared at this rate.
    pub fn sample_rate(&self) -> u32 {
        self.output_device
            .default_output_config()
            .map(|c| c.sample_rate())
            .unwrap_or(48000)
    }

    /// Names of the opened input and output devices.
    pub fn device_names(&self) -> (String, String) {
        let name = |d: &Device| device_name(d).unwrap_or_else(|_| "<unknown>".to_string());
        (name(&self.input_device), name(&self.output_device))
    }

    /// Flag that keeps [`run`](Self::run) alive; store `false` to stop.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Stream input through `delay` to the output, reading controls from
    /// `params` once per device buffer.
    ///
    /// Blocks until the running flag is cleared.
    pub fn run(&mut self, mut delay: FeedbackDelay, params: Arc<SharedParams>) -> Result<()> {
        let input_config = self
            .input_device
            .default_input_config()
            .map_err(|e| Error::Stream(e.to_string()))?;
        let output_config = self
            .output_device
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?;

        let input_channels = usize::from(input_config.channels()).max(1);
        let output_channels = usize::from(output_config.channels()).max(1);
        let sample_rate = output_config.sample_rate();

        if input_config.sample_rate() != sample_rate {
            tracing::warn!(
                input = input_config.sample_rate(),
                output = sample_rate,
                "input and output sample rates differ"
            );
        }

        delay.prepare(sample_rate as f32);
        delay.update(&params.snapshot());

        tracing::info!(
            sample_rate,
            input_channels,
            output_channels,
            "starting duplex stream"
        );

        let (producer, consumer) = input_queue(QUEUE_FRAMES, input_channels);
        let dropped_frames = Arc::new(AtomicUsize::new(0));
        self.running.store(true, Ordering::SeqCst);

        let input_running = Arc::clone(&self.running);
        let input_dropped = Arc::clone(&dropped_frames);
        let input_stream = self
            .input_device
            .build_input_stream(
                &input_config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if input_running.load(Ordering::Relaxed) {
                        let dropped = producer.push(data);
                        if dropped > 0 {
                            input_dropped.fetch_add(dropped, Ordering::Relaxed);
                        }
                    }
                },
                |err| tracing::error!(%err, "input stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        let output_running = Arc::clone(&self.running);
        let mut interleaved: Vec<f32> = Vec::new();
        let mut left: Vec<f32> = Vec::new();
        let mut right: Vec<f32> = Vec::new();

        let output_stream = self
            .output_device
            .build_output_stream(
                &output_config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !output_running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }

                    let frames = data.len() / output_channels;
                    let needed = frames * input_channels;

                    // Grows once to the device buffer size, then stays put
                    if left.len() < frames {
                        left.resize(frames, 0.0);
                        right.resize(frames, 0.0);
                        interleaved.resize(needed, 0.0);
                    }

                    let input = &mut interleaved[..needed];
                    if !consumer.pop_into(input) {
                        data.fill(0.0);
                        return;
                    }

                    let (l, r) = (&mut left[..frames], &mut right[..frames]);
                    deinterleave_into(input, input_channels, l, r);

                    let controls = params.snapshot();
                    delay.process_stereo_block(&controls, l, r);

                    interleave_into(l, r, data, output_channels);
                },
                |err| tracing::error!(%err, "output stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        input_stream
            .play()
            .map_err(|e| Error::Stream(e.to_string()))?;
        output_stream
            .play()
            .map_err(|e| Error::Stream(e.to_string()))?;

        self._input_stream = Some(input_stream);
        self._output_stream = Some(output_stream);

        while self.running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(50));
        }

        self._input_stream = None;
        self._output_stream = None;

        let dropped = dropped_frames.load(Ordering::Relaxed);
        if dropped > 0 {
            tracing::warn!(dropped, "input frames dropped while the output lagged");
        }
        tracing::info!("duplex stream stopped");
        Ok(())
    }

    /// Stop the stream.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the stream is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Split interleaved frames into left/right. Mono input feeds both sides;
/// channels past the second are ignored.
fn deinterleave_into(interleaved: &[f32], channels: usize, left: &mut [f32], right: &mut [f32]) {
    let frames = interleaved.chunks_exact(channels);
    for ((frame, l), r) in frames.zip(left.iter_mut()).zip(right.iter_mut()) {
        *l = frame[0];
        *r = frame.get(1).copied().unwrap_or(frame[0]);
    }
}

/// Interleave left/right into the device buffer. A mono device gets the
/// average; channels past the second are silenced.
fn interleave_into(left: &[f32], right: &[f32], output: &mut [f32], channels: usize) {
    let frames = output.chunks_exact_mut(channels);
    for ((frame, &l), &r) in frames.zip(left).zip(right) {
        match frame {
            [mono] => *mono = (l + r) * 0.5,
            [out_l, out_r, rest @ ..] => {
                *out_l = l;
                *out_r = r;
                rest.fill(0.0);
            }
            [] => {}
        }
    }
}

/// Find a device by index, exact name, or case-insensitive fragment.
fn find_device(host: &Host, name_or_index: &str, is_input: bool) -> Result<Device> {
    let kind = if is_input { "input" } else { "output" };
    let devices: Vec<Device> = if is_input {
        host.input_devices()
            .map_err(|e| Error::Stream(e.to_string()))?
            .collect()
    } else {
        host.output_devices()
            .map_err(|e| Error::Stream(e.to_string()))?
            .collect()
    };

    if let Ok(index) = name_or_index.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "{kind} device index {index} (only {} devices available)",
                devices.len()
            ))
        });
    }

    if let Some(device) = devices
        .iter()
        .find(|d| device_name(d).is_ok_and(|n| n == name_or_index))
    {
        return Ok(device.clone());
    }

    let search = name_or_index.to_lowercase();
    let matches: Vec<(&Device, String)> = devices
        .iter()
        .filter_map(|d| device_name(d).ok().map(|n| (d, n)))
        .filter(|(_, n)| n.to_lowercase().contains(&search))
        .collect();

    match matches.as_slice() {
        [] => Err(Error::DeviceNotFound(format!(
            "no {kind} device matching '{name_or_index}'"
        ))),
        [(device, _)] => Ok((*device).clone()),
        [(device, first), ..] => {
            let names: Vec<&str> = matches.iter().map(|(_, n)| n.as_str()).collect();
            tracing::warn!(
                search = name_or_index,
                ?names,
                "multiple {kind} devices match, using {first}"
            );
            Ok((*device).clone())
        }
    }
}
