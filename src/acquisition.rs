//! Interrupt-driven acquisition for one sensor instance.
//!
//! [`Acquisition`] owns the sensor for its whole lifecycle:
//!
//! 1. [`start`](Acquisition::start) writes the startup configuration and
//!    enables the watermark interrupt.
//! 2. Each interrupt runs [`handle_interrupt`](Acquisition::handle_interrupt),
//!    either called directly by the platform's interrupt thread or through an
//!    [`InterruptTrigger`] feeding the worker started with
//!    [`spawn_interrupt_worker`](Acquisition::spawn_interrupt_worker).
//! 3. Consumers read buffered values through [`BlockingReader`] or
//!    [`AxisStream`], and query live registers with
//!    [`query`](Acquisition::query).
//! 4. [`shutdown`](Acquisition::shutdown) (or drop) closes the buffer, stops
//!    the worker and puts the sensor in standby.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::config::Config;
use crate::device::{Adxl345, DeviceState};
use crate::error::Result;
use crate::fifo::{Axis, DrainReport};
use crate::interface::Adxl345Interface;
use crate::interface::shared::SharedInterface;
use crate::query::{self, AxisQuery, QueryRequest, QueryResponse};
use crate::reader::{AxisStream, BlockingReader};
use crate::registry::{Registration, Registry};
use crate::stream::SampleBuffer;

enum Event {
    Interrupt,
    Shutdown,
}

/// Signals watermark interrupts to the acquisition worker.
#[derive(Clone)]
pub struct InterruptTrigger {
    events: Sender<Event>,
}

impl InterruptTrigger {
    /// Queues one drain. Returns `false` once the worker has stopped.
    pub fn fire(&self) -> bool {
        self.events.send(Event::Interrupt).is_ok()
    }
}

type SharedDriver<IFACE> = Arc<Mutex<Adxl345<SharedInterface<IFACE>>>>;

/// One active sensor: producer, shared buffer and live query path.
pub struct Acquisition<IFACE>
where
    IFACE: Adxl345Interface,
{
    registration: Registration,
    driver: SharedDriver<IFACE>,
    bus: SharedInterface<IFACE>,
    buffer: Arc<SampleBuffer>,
    events: Sender<Event>,
    pending_events: Mutex<Option<Receiver<Event>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drains the hardware FIFO into `buffer` and wakes its waiters.
fn drain_into<IFACE>(
    driver: &Mutex<Adxl345<SharedInterface<IFACE>>>,
    buffer: &SampleBuffer,
    id: u32,
) -> DrainReport
where
    IFACE: Adxl345Interface,
{
    let mut driver = lock(driver);
    if driver.state() != DeviceState::Active {
        log_debug!("adxl345-{}: interrupt while inactive, ignored", id);
        return DrainReport::default();
    }

    let report = match driver.drain_fifo(|sample| buffer.push(sample)) {
        Ok(report) => report,
        Err(_) => {
            log_warn!("adxl345-{}: FIFO status read failed", id);
            DrainReport::default()
        }
    };
    drop(driver);

    buffer.wake_all();
    if report.dropped > 0 {
        log_warn!(
            "adxl345-{}: dropped {} of {} FIFO entries",
            id,
            report.dropped,
            report.pending
        );
    }
    report
}

impl<IFACE> Acquisition<IFACE>
where
    IFACE: Adxl345Interface,
{
    /// Registers a new instance and writes the startup configuration.
    ///
    /// On failure nothing stays claimed: the registry slot is released and
    /// the interface is dropped.
    pub fn start(
        interface: IFACE,
        config: Config,
        registry: &Arc<Registry>,
    ) -> Result<Self, IFACE::Error> {
        let registration = registry.register();
        let bus = SharedInterface::new(interface);

        let mut driver = Adxl345::new(bus.clone(), config);
        if let Err(err) = driver.init() {
            log_error!("adxl345-{}: initialization failed", registration.id());
            return Err(err);
        }
        log_info!("adxl345-{}: acquisition started", registration.id());

        let (events, pending_events) = mpsc::channel();
        Ok(Self {
            registration,
            driver: Arc::new(Mutex::new(driver)),
            bus,
            buffer: Arc::new(SampleBuffer::new()),
            events,
            pending_events: Mutex::new(Some(pending_events)),
            worker: Mutex::new(None),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Instance name, `adxl345-<id>`.
    pub fn name(&self) -> String {
        self.registration.to_string()
    }

    /// Current lifecycle state of the sensor.
    pub fn state(&self) -> DeviceState {
        lock(&self.driver).state()
    }

    /// Runs one FIFO drain on the calling thread.
    ///
    /// Failed entries are dropped and logged, never propagated.
    pub fn handle_interrupt(&self) -> DrainReport {
        drain_into(&self.driver, &self.buffer, self.registration.id())
    }

    /// Returns a reader over the buffered samples.
    pub fn reader(&self) -> BlockingReader {
        BlockingReader::new(Arc::clone(&self.buffer))
    }

    /// Returns a byte stream of buffered `axis` values.
    pub fn stream(&self, axis: Axis) -> AxisStream {
        self.reader().stream(axis)
    }

    /// The buffer shared by the producer and readers.
    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        &self.buffer
    }

    /// Validates `request`, then reads the axis registers live from the sensor.
    pub fn query(&self, request: QueryRequest) -> Result<QueryResponse, IFACE::Error> {
        query::handle_request(&mut self.bus.clone(), request)
    }

    /// Reads both data bytes of `axis` live from the sensor.
    pub fn query_axis(&self, axis: Axis) -> Result<i16, IFACE::Error> {
        let response = query::query_axis(&mut self.bus.clone(), AxisQuery::full(axis))?;
        Ok(response.raw())
    }

    /// Closes the buffer, stops the worker and puts the sensor in standby.
    ///
    /// Blocked readers return end-of-stream. Calling it again is a no-op.
    pub fn shutdown(&self) -> Result<(), IFACE::Error> {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        self.buffer.close();
        let _ = self.events.send(Event::Shutdown);
        if let Some(worker) = lock(&self.worker).take() {
            if worker.join().is_err() {
                log_error!(
                    "adxl345-{}: interrupt worker panicked",
                    self.registration.id()
                );
            }
        }

        lock(&self.driver).standby()?;
        log_info!("adxl345-{}: acquisition stopped", self.registration.id());
        Ok(())
    }
}

impl<IFACE> Acquisition<IFACE>
where
    IFACE: Adxl345Interface + Send + 'static,
{
    /// Starts the interrupt worker on first call and returns a trigger for it.
    pub fn spawn_interrupt_worker(&self) -> io::Result<InterruptTrigger> {
        let trigger = InterruptTrigger {
            events: self.events.clone(),
        };

        let mut worker = lock(&self.worker);
        if worker.is_some() {
            return Ok(trigger);
        }
        if self.shut_down.load(Ordering::Acquire) {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "acquisition stopped",
            ));
        }
        let Some(events) = lock(&self.pending_events).take() else {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "worker already ran",
            ));
        };

        let driver = Arc::clone(&self.driver);
        let buffer = Arc::clone(&self.buffer);
        let id = self.registration.id();
        let handle = thread::Builder::new().name(self.name()).spawn(move || {
            for event in events {
                match event {
                    Event::Interrupt => {
                        drain_into(&driver, &buffer, id);
                    }
                    Event::Shutdown => break,
                }
            }
            log_debug!("adxl345-{}: interrupt worker exiting", id);
        })?;

        *worker = Some(handle);
        Ok(trigger)
    }
}

impl<IFACE> Drop for Acquisition<IFACE>
where
    IFACE: Adxl345Interface,
{
    fn drop(&mut self) {
        if self.shutdown().is_err() {
            log_warn!(
                "adxl345-{}: standby write failed during teardown",
                self.registration.id()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::error::Error;
    use crate::fifo::Sample;
    use crate::registers::{REG_DATA_FORMAT, REG_POWER_CTL};
    use crate::ring::CAPACITY;
    use crate::testing::FakeBus;

    fn numbered(range: std::ops::Range<i16>) -> Vec<Sample> {
        range.map(|n| Sample::new(n, n * 10, n * 100)).collect()
    }

    fn started(bus: &FakeBus) -> (Arc<Registry>, Acquisition<FakeBus>) {
        let registry = Arc::new(Registry::new());
        let config = Config::default();
        let acquisition = Acquisition::start(bus.clone(), config, &registry).unwrap();
        (registry, acquisition)
    }

    #[test]
    fn start_configures_and_activates() {
        let bus = FakeBus::new();
        let (registry, acquisition) = started(&bus);

        assert_eq!(
            bus.writes(),
            vec![
                (0x2C, 0x0A),
                (0x31, 0x00),
                (0x38, 148),
                (0x2D, 0x08),
                (0x2E, 0x01),
            ]
        );
        assert_eq!(acquisition.state(), DeviceState::Active);
        assert_eq!(acquisition.name(), "adxl345-0");
        assert_eq!(registry.live(), 1);
    }

    #[test]
    fn failed_start_releases_registration() {
        let bus = FakeBus::new();
        bus.fail_writes_to(REG_DATA_FORMAT);
        let registry = Arc::new(Registry::new());

        let result = Acquisition::start(bus.clone(), Config::default(), &registry);
        assert!(matches!(result, Err(Error::Interface(_))));
        assert_eq!(registry.live(), 0);
        assert_eq!(bus.writes(), vec![(0x2C, 0x0A)]);
    }

    #[test]
    fn drain_drops_only_the_failed_entry() {
        let bus = FakeBus::new();
        let (_registry, acquisition) = started(&bus);
        bus.load_fifo(numbered(1..6));
        bus.fail_burst(3);

        let report = acquisition.handle_interrupt();

        let expected = DrainReport {
            pending: 5,
            delivered: 4,
            dropped: 1,
        };
        assert_eq!(report, expected);
        let snapshot = acquisition.buffer().snapshot();
        let xs: Vec<i16> = snapshot.iter().map(|s| s.x).collect();
        assert_eq!(xs, [1, 2, 4, 5]);
        assert_eq!(bus.fifo_len(), 0);
    }

    #[test]
    fn repeated_interrupts_keep_the_latest_samples() {
        let bus = FakeBus::new();
        let (_registry, acquisition) = started(&bus);

        for chunk in numbered(0..70).chunks(20) {
            bus.load_fifo(chunk.iter().copied());
            acquisition.handle_interrupt();
        }

        let reader = acquisition.reader();
        let xs = reader.read(Axis::X, CAPACITY);
        assert_eq!(xs, (6..70).collect::<Vec<_>>());
    }

    #[test]
    fn worker_feeds_blocked_reader() {
        let bus = FakeBus::new();
        let (_registry, acquisition) = started(&bus);
        let trigger = acquisition.spawn_interrupt_worker().unwrap();

        let reader = acquisition.reader();
        let consumer = thread::spawn(move || {
            let mut values = Vec::new();
            while values.len() < 3 {
                let chunk = reader.read(Axis::Y, 3 - values.len());
                assert!(!chunk.is_empty(), "stream ended early");
                values.extend(chunk);
            }
            values
        });

        thread::sleep(Duration::from_millis(20));
        bus.load_fifo(numbered(1..4));
        assert!(trigger.fire());

        assert_eq!(consumer.join().unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn query_ignores_buffer_contents() {
        let bus = FakeBus::new();
        let (_registry, acquisition) = started(&bus);
        bus.set_axis(Axis::Y, 1234);

        let empty = acquisition.query_axis(Axis::Y).unwrap();

        bus.load_fifo(numbered(0..31));
        acquisition.handle_interrupt();
        bus.load_fifo(numbered(31..62));
        acquisition.handle_interrupt();
        bus.load_fifo(numbered(62..70));
        acquisition.handle_interrupt();
        assert_eq!(acquisition.buffer().len(), CAPACITY);

        let full = acquisition.query_axis(Axis::Y).unwrap();
        assert_eq!(empty, 1234);
        assert_eq!(full, empty);
    }

    #[test]
    fn query_validates_request_shape() {
        let bus = FakeBus::new();
        let (_registry, acquisition) = started(&bus);
        bus.set_axis(Axis::X, 0x0102);

        let result = acquisition.query(QueryRequest { axis: 7, length: 2 });
        assert_eq!(result, Err(Error::InvalidAxis(7)));
        let result = acquisition.query(QueryRequest { axis: 0, length: 3 });
        assert_eq!(result, Err(Error::InvalidLength(3)));

        let request = QueryRequest { axis: 0, length: 1 };
        let response = acquisition.query(request).unwrap();
        assert_eq!(response.value, [0x02, 0x00]);
    }

    #[test]
    fn queries_and_drains_never_share_a_transaction() {
        let bus = FakeBus::new();
        let (_registry, acquisition) = started(&bus);
        let acquisition = Arc::new(acquisition);

        let queries: Vec<_> = (0..3)
            .map(|_| {
                let acquisition = Arc::clone(&acquisition);
                let request = QueryRequest { axis: 2, length: 2 };
                thread::spawn(move || {
                    for _ in 0..50 {
                        acquisition.query(request).unwrap();
                    }
                })
            })
            .collect();
        for round in 0..20 {
            bus.load_fifo(numbered(round * 5..round * 5 + 5));
            acquisition.handle_interrupt();
        }
        for handle in queries {
            handle.join().unwrap();
        }

        assert_eq!(bus.max_concurrent_transactions(), 1);
    }

    #[test]
    fn shutdown_releases_readers_and_enters_standby() {
        let bus = FakeBus::new();
        let (_registry, acquisition) = started(&bus);
        let trigger = acquisition.spawn_interrupt_worker().unwrap();

        let reader = acquisition.reader();
        let consumer = thread::spawn(move || reader.read(Axis::X, 8));

        thread::sleep(Duration::from_millis(20));
        acquisition.shutdown().unwrap();

        assert!(consumer.join().unwrap().is_empty());
        assert!(!trigger.fire());
        assert_eq!(bus.writes().last(), Some(&(REG_POWER_CTL, 0x00)));
        assert_eq!(acquisition.state(), DeviceState::Standby);

        bus.load_fifo(numbered(0..3));
        assert_eq!(acquisition.handle_interrupt(), DrainReport::default());
        acquisition.shutdown().unwrap();
    }

    #[test]
    fn drop_tears_down_and_frees_the_slot() {
        let bus = FakeBus::new();
        let (registry, acquisition) = started(&bus);
        acquisition.spawn_interrupt_worker().unwrap();

        drop(acquisition);

        assert_eq!(registry.live(), 0);
        assert_eq!(bus.writes().last(), Some(&(REG_POWER_CTL, 0x00)));
    }
}
