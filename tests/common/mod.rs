//! In-memory process table shared by the integration tests

#![allow(dead_code)]

use procpeek::process::{ProcessAccessor, ProcessSystem};
use procpeek::{Address, MemoryError, MemoryResult, ModuleRecord, ProcessDescriptor, ProcessId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Counters observed by tests after a session has finished
#[derive(Debug, Default)]
pub struct Counters {
    pub snapshots: Cell<u32>,
    pub opened: Cell<u32>,
    pub closed: Cell<u32>,
    pub module_queries: Cell<u32>,
    pub reads: Cell<u32>,
}

impl Counters {
    /// Handles opened but not yet closed
    pub fn open_handles(&self) -> u32 {
        self.opened.get() - self.closed.get()
    }
}

/// One simulated process
#[derive(Debug, Clone)]
pub struct FakeProcess {
    pub descriptor: ProcessDescriptor,
    pub modules: Vec<ModuleRecord>,
    /// Readable byte windows keyed by base address
    pub memory: Vec<(usize, Vec<u8>)>,
    pub deny_open: bool,
    /// Open fails with a platform error rather than a skippable one
    pub break_open: bool,
    /// Module enumeration failures to report before succeeding
    pub flaky_module_queries: u32,
}

impl FakeProcess {
    pub fn new(name: &str, pid: ProcessId) -> Self {
        FakeProcess {
            descriptor: ProcessDescriptor::new(name, pid),
            modules: Vec::new(),
            memory: Vec::new(),
            deny_open: false,
            break_open: false,
            flaky_module_queries: 0,
        }
    }

    /// Add a module whose image starts with a PE header
    pub fn with_module(mut self, name: &str, base: usize, size: usize) -> Self {
        self.modules
            .push(ModuleRecord::new(name, Address::new(base), size).with_path(format!(
                r"C:\Windows\System32\{}",
                name
            )));
        let mut image = vec![0u8; size];
        image[..4].copy_from_slice(&[0x4D, 0x5A, 0x90, 0x00]);
        for (i, byte) in image.iter_mut().enumerate().skip(4) {
            *byte = (i % 251) as u8;
        }
        self.memory.push((base, image));
        self
    }

    pub fn denied(mut self) -> Self {
        self.deny_open = true;
        self
    }

    pub fn broken(mut self) -> Self {
        self.break_open = true;
        self
    }

    pub fn flaky(mut self, failures: u32) -> Self {
        self.flaky_module_queries = failures;
        self
    }
}

/// Process table plus counters
#[derive(Clone, Default)]
pub struct FakeSystem {
    processes: Rc<RefCell<Vec<FakeProcess>>>,
    flakes: Rc<RefCell<HashMap<ProcessId, u32>>>,
    pub counters: Rc<Counters>,
}

impl FakeSystem {
    pub fn new(processes: Vec<FakeProcess>) -> Self {
        let flakes = processes
            .iter()
            .map(|p| (p.descriptor.pid, p.flaky_module_queries))
            .collect();
        FakeSystem {
            processes: Rc::new(RefCell::new(processes)),
            flakes: Rc::new(RefCell::new(flakes)),
            counters: Rc::new(Counters::default()),
        }
    }

    /// A machine with a handful of ordinary processes
    pub fn typical() -> Self {
        FakeSystem::new(vec![
            FakeProcess::new("System", 4),
            FakeProcess::new("explorer.exe", 1200)
                .with_module("explorer.exe", 0x7FF6_1000_0000, 0x1000)
                .with_module("ntdll.dll", 0x7FFA_0000_0000, 0x2000),
            FakeProcess::new("notepad.exe", 4242)
                .with_module("notepad.exe", 0x7FF7_2000_0000, 0x1000)
                .with_module("ntdll.dll", 0x7FFA_0000_0000, 0x2000)
                .with_module("KERNEL32.DLL", 0x7FFA_1000_0000, 0x1000),
        ])
    }

    /// Simulate a process exiting between the snapshot and the open
    pub fn remove(&self, pid: ProcessId) {
        self.processes
            .borrow_mut()
            .retain(|p| p.descriptor.pid != pid);
    }
}

impl ProcessSystem for FakeSystem {
    fn list_processes(&self) -> MemoryResult<Vec<ProcessDescriptor>> {
        self.counters.snapshots.set(self.counters.snapshots.get() + 1);
        Ok(self
            .processes
            .borrow()
            .iter()
            .map(|p| p.descriptor.clone())
            .collect())
    }

    fn open(&self, pid: ProcessId) -> MemoryResult<Box<dyn ProcessAccessor>> {
        let processes = self.processes.borrow();
        let process = processes
            .iter()
            .find(|p| p.descriptor.pid == pid)
            .ok_or(MemoryError::ProcessExited { pid })?;
        if process.deny_open {
            return Err(MemoryError::access_denied(pid, "protected process"));
        }
        if process.break_open {
            return Err(MemoryError::WindowsApi(format!(
                "OpenProcess({}): Unknown error: 31",
                pid
            )));
        }
        self.counters.opened.set(self.counters.opened.get() + 1);
        Ok(Box::new(FakeHandle {
            process: process.clone(),
            flakes: Rc::clone(&self.flakes),
            counters: Rc::clone(&self.counters),
            open: true,
        }))
    }
}

struct FakeHandle {
    process: FakeProcess,
    flakes: Rc<RefCell<HashMap<ProcessId, u32>>>,
    counters: Rc<Counters>,
    open: bool,
}

impl ProcessAccessor for FakeHandle {
    fn pid(&self) -> ProcessId {
        self.process.descriptor.pid
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn modules(&self) -> MemoryResult<Vec<ModuleRecord>> {
        self.counters
            .module_queries
            .set(self.counters.module_queries.get() + 1);
        let mut flakes = self.flakes.borrow_mut();
        if let Some(remaining) = flakes.get_mut(&self.pid()) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(MemoryError::WindowsApi(
                    "EnumProcessModulesEx: Partial copy".to_string(),
                ));
            }
        }
        Ok(self.process.modules.clone())
    }

    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        self.counters.reads.set(self.counters.reads.get() + 1);
        let start = address.as_usize();
        for (base, bytes) in &self.process.memory {
            let end = base + bytes.len();
            if start >= *base && start < end {
                let available = (end - start).min(buffer.len());
                let offset = start - base;
                buffer[..available].copy_from_slice(&bytes[offset..offset + available]);
                return Ok(available);
            }
        }
        Err(MemoryError::access_violation(address, buffer.len()))
    }

    fn close(&mut self) -> MemoryResult<()> {
        if self.open {
            self.open = false;
            self.counters.closed.set(self.counters.closed.get() + 1);
        }
        Ok(())
    }
}
