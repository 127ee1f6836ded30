//! Register-file model of the sensor used by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::fifo::{Axis, Sample};
use crate::interface::Adxl345Interface;
use crate::registers::{
    EXPECTED_DEVID, MAX_WATERMARK, REG_DATAX0, REG_DEVID, REG_FIFO_STATUS, SAMPLE_BYTES,
};

/// Error raised by the model when a transfer is made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

struct Model {
    registers: [u8; 0x40],
    fifo: VecDeque<Sample>,
    bursts: usize,
    failing_bursts: Vec<usize>,
    failing_writes: Vec<u8>,
    writes: Vec<(u8, u8)>,
}

/// Clonable handle to one simulated sensor.
#[derive(Clone)]
pub struct FakeBus {
    model: Arc<Mutex<Model>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FakeBus {
    pub fn new() -> Self {
        let mut registers = [0u8; 0x40];
        registers[REG_DEVID as usize] = EXPECTED_DEVID;
        let model = Model {
            registers,
            fifo: VecDeque::new(),
            bursts: 0,
            failing_bursts: Vec::new(),
            failing_writes: Vec::new(),
            writes: Vec::new(),
        };
        Self {
            model: Arc::new(Mutex::new(model)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queues entries in the hardware FIFO.
    pub fn load_fifo(&self, samples: impl IntoIterator<Item = Sample>) {
        self.model.lock().unwrap().fifo.extend(samples);
    }

    /// Number of entries still held by the hardware FIFO.
    pub fn fifo_len(&self) -> usize {
        self.model.lock().unwrap().fifo.len()
    }

    /// Sets the live data registers of `axis`.
    pub fn set_axis(&self, axis: Axis, value: i16) {
        let [low, high] = value.to_le_bytes();
        let mut model = self.model.lock().unwrap();
        model.registers[axis.low_register() as usize] = low;
        model.registers[axis.high_register() as usize] = high;
    }

    /// Makes the `nth` burst read from now on (1-based) fail.
    pub fn fail_burst(&self, nth: usize) {
        let mut model = self.model.lock().unwrap();
        let target = model.bursts + nth;
        model.failing_bursts.push(target);
    }

    /// Makes every write to `register` fail.
    pub fn fail_writes_to(&self, register: u8) {
        self.model.lock().unwrap().failing_writes.push(register);
    }

    /// Successful register writes, in bus order.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.model.lock().unwrap().writes.clone()
    }

    /// Highest number of transactions observed in progress at once.
    pub fn max_concurrent_transactions(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn transaction<R>(&self, f: impl FnOnce(&mut Model) -> R) -> R {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        std::thread::yield_now();
        let result = f(&mut self.model.lock().unwrap());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl Adxl345Interface for FakeBus {
    type Error = FakeError;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.transaction(|model| {
            if model.failing_writes.contains(&register) {
                return Err(FakeError);
            }
            model.registers[register as usize] = value;
            model.writes.push((register, value));
            Ok(())
        })
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        self.transaction(|model| {
            if register == REG_FIFO_STATUS {
                return Ok(model.fifo.len().min(MAX_WATERMARK as usize) as u8);
            }
            Ok(model.registers[register as usize])
        })
    }

    fn read_burst(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.transaction(|model| {
            if register == REG_DATAX0 && buf.len() == SAMPLE_BYTES {
                model.bursts += 1;
                let entry = model.fifo.pop_front();
                if model.failing_bursts.contains(&model.bursts) {
                    return Err(FakeError);
                }
                if let Some(sample) = entry {
                    buf[0..2].copy_from_slice(&sample.x.to_le_bytes());
                    buf[2..4].copy_from_slice(&sample.y.to_le_bytes());
                    buf[4..6].copy_from_slice(&sample.z.to_le_bytes());
                    return Ok(());
                }
            }

            let start = register as usize;
            buf.copy_from_slice(&model.registers[start..start + buf.len()]);
            Ok(())
        })
    }
}
