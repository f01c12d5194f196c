//! Test doubles for the PI5USB30213A driver.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use embedded_hal::delay::DelayNs;

use drp_driver_api::bus::ErrorKind;
use drp_driver_api::{
    BlockBus, DataRole, DriverError, IrqRequest, PlatformServices, RoleSwitch, TransportError,
    TypecCapability, TypecPort, UsbRole,
};

use super::regs::{REG_FILE_LEN, RegisterImage};
use super::transport::RegisterTransport;

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Pops one from `counter` if it is non-zero.
fn take(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

// ---------------------------------------------------------------------------
// LoopbackBus
// ---------------------------------------------------------------------------

/// A [`BlockBus`] that stores whatever frame is sent and returns it on
/// receive. Scripted results replace the next transfers.
pub struct LoopbackBus {
    frame: [u8; REG_FILE_LEN],
    send_script: VecDeque<Result<usize, ErrorKind>>,
    recv_script: VecDeque<Result<usize, ErrorKind>>,
}

impl LoopbackBus {
    pub fn new(frame: [u8; REG_FILE_LEN]) -> Self {
        Self {
            frame,
            send_script: VecDeque::new(),
            recv_script: VecDeque::new(),
        }
    }

    /// The next send returns `result` and does not store the frame.
    pub fn script_send(&mut self, result: Result<usize, ErrorKind>) {
        self.send_script.push_back(result);
    }

    /// The next receive returns `result`, copying `n` bytes on `Ok(n)`.
    pub fn script_recv(&mut self, result: Result<usize, ErrorKind>) {
        self.recv_script.push_back(result);
    }
}

impl BlockBus for LoopbackBus {
    fn send(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        if let Some(result) = self.send_script.pop_front() {
            return result;
        }
        let n = buf.len().min(REG_FILE_LEN);
        self.frame[..n].copy_from_slice(&buf[..n]);
        Ok(n)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        let result = self
            .recv_script
            .pop_front()
            .unwrap_or(Ok(buf.len().min(REG_FILE_LEN)));
        if let Ok(n) = result {
            let n = n.min(buf.len()).min(REG_FILE_LEN);
            buf[..n].copy_from_slice(&self.frame[..n]);
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Simulated hardware
// ---------------------------------------------------------------------------

/// One access to the simulated device, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwEvent {
    /// A successful register file read.
    Read,
    /// A successful register file write.
    Write(RegisterImage),
    /// A settle wait, in nanoseconds.
    Settle(u32),
}

/// A PI5USB30213A behind an instrumented bus.
///
/// Writes only change the control byte, as on the real part. Every access
/// is checked for overlap with another one in flight.
#[derive(Default)]
pub struct Hardware {
    regs: Mutex<RegisterImage>,
    events: Mutex<Vec<HwEvent>>,
    fail_reads: AtomicUsize,
    fail_writes: AtomicUsize,
    busy: AtomicBool,
    overlaps: AtomicUsize,
}

impl Hardware {
    pub fn new(regs: RegisterImage) -> Arc<Self> {
        Arc::new(Self {
            regs: Mutex::new(regs),
            ..Self::default()
        })
    }

    pub fn regs(&self) -> RegisterImage {
        *locked(&self.regs)
    }

    pub fn set_status(&self, status: u8) {
        locked(&self.regs).status = status;
    }

    pub fn set_control(&self, control: u8) {
        locked(&self.regs).control = control;
    }

    pub fn fail_next_reads(&self, n: usize) {
        self.fail_reads.store(n, Ordering::SeqCst);
    }

    pub fn fail_next_writes(&self, n: usize) {
        self.fail_writes.store(n, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<HwEvent> {
        locked(&self.events).clone()
    }

    pub fn writes(&self) -> Vec<RegisterImage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HwEvent::Write(image) => Some(image),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, HwEvent::Read))
            .count()
    }

    /// Number of accesses that started while another was in flight.
    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        if self.busy.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        thread::yield_now();
    }

    fn leave(&self) {
        thread::yield_now();
        self.busy.store(false, Ordering::SeqCst);
    }

    fn record(&self, event: HwEvent) {
        locked(&self.events).push(event);
    }
}

/// [`RegisterTransport`] onto a shared [`Hardware`].
pub struct FakeTransport {
    hw: Arc<Hardware>,
}

impl FakeTransport {
    pub fn new(hw: &Arc<Hardware>) -> Self {
        Self { hw: Arc::clone(hw) }
    }
}

impl RegisterTransport for FakeTransport {
    fn read_all(&mut self) -> Result<RegisterImage, TransportError> {
        self.hw.enter();
        let result = if take(&self.hw.fail_reads) {
            Err(TransportError::Bus(ErrorKind::Bus))
        } else {
            let mut regs = locked(&self.hw.regs);
            let image = *regs;
            // Interrupt causes clear on read.
            regs.interrupt = 0;
            drop(regs);
            self.hw.record(HwEvent::Read);
            Ok(image)
        };
        self.hw.leave();
        result
    }

    fn write_all(&mut self, image: &RegisterImage) -> Result<(), TransportError> {
        self.hw.enter();
        let result = if take(&self.hw.fail_writes) {
            Err(TransportError::ShortTransfer {
                expected: REG_FILE_LEN,
                actual: 0,
            })
        } else {
            locked(&self.hw.regs).control = image.control;
            self.hw.record(HwEvent::Write(*image));
            Ok(())
        };
        self.hw.leave();
        result
    }
}

/// A [`DelayNs`] that returns at once and logs the wait on the hardware.
pub struct SettleDelay {
    hw: Arc<Hardware>,
}

impl SettleDelay {
    pub fn new(hw: &Arc<Hardware>) -> Self {
        Self { hw: Arc::clone(hw) }
    }
}

impl DelayNs for SettleDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.hw.record(HwEvent::Settle(ns));
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Something the platform was asked to do, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    RoleSwitchGet,
    RoleSwitchPut,
    PortRegistered(TypecCapability),
    PortUnregistered,
    IrqBound(IrqRequest),
    IrqFreed,
    SetRole(UsbRole),
    SetDataRole(DataRole),
}

/// Shared record of platform activity plus injectable failures.
#[derive(Default)]
pub struct Platform {
    events: Mutex<Vec<PlatformEvent>>,
    pub fail_role_switch: AtomicBool,
    pub fail_port: AtomicBool,
    pub fail_irq: AtomicBool,
    pub reject_roles: AtomicBool,
}

impl Platform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PlatformEvent> {
        locked(&self.events).clone()
    }

    pub fn clear(&self) {
        locked(&self.events).clear();
    }

    pub fn roles(&self) -> Vec<UsbRole> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PlatformEvent::SetRole(role) => Some(role),
                _ => None,
            })
            .collect()
    }

    pub fn data_roles(&self) -> Vec<DataRole> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PlatformEvent::SetDataRole(role) => Some(role),
                _ => None,
            })
            .collect()
    }

    /// Events that acquire or release a resource.
    pub fn lifecycle(&self) -> Vec<PlatformEvent> {
        self.events()
            .into_iter()
            .filter(|e| {
                !matches!(
                    e,
                    PlatformEvent::SetRole(_) | PlatformEvent::SetDataRole(_)
                )
            })
            .collect()
    }

    fn record(&self, event: PlatformEvent) {
        locked(&self.events).push(event);
    }
}

pub struct FakeRoleSwitch {
    platform: Arc<Platform>,
}

impl RoleSwitch for FakeRoleSwitch {
    fn set_role(&self, role: UsbRole) -> Result<(), DriverError> {
        self.platform.record(PlatformEvent::SetRole(role));
        if self.platform.reject_roles.load(Ordering::SeqCst) {
            return Err(DriverError::IoError);
        }
        Ok(())
    }
}

impl Drop for FakeRoleSwitch {
    fn drop(&mut self) {
        self.platform.record(PlatformEvent::RoleSwitchPut);
    }
}

pub struct FakePort {
    platform: Arc<Platform>,
}

impl TypecPort for FakePort {
    fn set_data_role(&self, role: DataRole) {
        self.platform.record(PlatformEvent::SetDataRole(role));
    }
}

impl Drop for FakePort {
    fn drop(&mut self) {
        self.platform.record(PlatformEvent::PortUnregistered);
    }
}

pub struct FakeIrq {
    platform: Arc<Platform>,
}

impl Drop for FakeIrq {
    fn drop(&mut self) {
        self.platform.record(PlatformEvent::IrqFreed);
    }
}

/// [`PlatformServices`] handing out recording handles.
pub struct FakeServices {
    platform: Arc<Platform>,
}

impl FakeServices {
    pub fn new(platform: &Arc<Platform>) -> Self {
        Self {
            platform: Arc::clone(platform),
        }
    }
}

impl PlatformServices for FakeServices {
    type RoleSwitch = FakeRoleSwitch;
    type Port = FakePort;
    type Irq = FakeIrq;

    fn get_role_switch(&self) -> Result<FakeRoleSwitch, DriverError> {
        if self.platform.fail_role_switch.load(Ordering::SeqCst) {
            return Err(DriverError::DeviceNotFound);
        }
        self.platform.record(PlatformEvent::RoleSwitchGet);
        Ok(FakeRoleSwitch {
            platform: Arc::clone(&self.platform),
        })
    }

    fn register_port(&self, capability: &TypecCapability) -> Result<FakePort, DriverError> {
        if self.platform.fail_port.load(Ordering::SeqCst) {
            return Err(DriverError::InitFailed);
        }
        self.platform
            .record(PlatformEvent::PortRegistered(*capability));
        Ok(FakePort {
            platform: Arc::clone(&self.platform),
        })
    }

    fn request_threaded_irq(&self, request: &IrqRequest) -> Result<FakeIrq, DriverError> {
        if self.platform.fail_irq.load(Ordering::SeqCst) {
            return Err(DriverError::InvalidState);
        }
        self.platform.record(PlatformEvent::IrqBound(*request));
        Ok(FakeIrq {
            platform: Arc::clone(&self.platform),
        })
    }
}
