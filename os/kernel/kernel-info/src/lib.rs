//! # Kernel Configuration and Boot Handoff Types
//!
//! This crate defines the capacity limits, the address-width configuration and
//! the *kernel description* types that connect the boot information walker
//! (`kernel-bootinfo`) with the initial process table (`kernel-process`).
//!
//! ## Overview
//!
//! During early boot the kernel translates the bootloader's Multiboot2
//! information into trusted in-kernel state. That translation happens in two
//! steps that must agree on a handful of numbers and on one data shape:
//!
//! ```text
//! Boot information buffer (bootloader owned, untrusted)
//!     ↓  kernel-bootinfo: parse + BootInfoCollector
//! KernelDescription<'_>   (this crate; borrowed, unvalidated)
//!     ↓  kernel-process: ProcessTable::init
//! ProcessTable            (fixed capacity, validated)
//! ```
//!
//! Keeping the shared pieces here avoids a dependency between the parser and
//! the builder and gives a single source of truth for the capacities.
//!
//! ## Modules
//!
//! ### Limits ([`limits`])
//! Compile-time capacities of the process table and its slots, plus the
//! capacities of the boot information aggregation step.
//!
//! ### Memory ([`memory`])
//! The [`AddressWidth`](memory::AddressWidth) configuration that bounds every
//! address a memory area may carry.
//!
//! ### Boot Handoff ([`boot`])
//! [`KernelDescription`](boot::KernelDescription) and its parts. All fields
//! are plain, unvalidated values; validation is the builder's job.
//!
//! ## Usage
//!
//! ```rust
//! use kernel_info::boot::{AreaDescription, KernelDescription, ModuleDescription};
//!
//! let areas = [AreaDescription::new(0, 0x1000, 0xFFF)];
//! let modules = [ModuleDescription::new(0x2000, 0x100, 0x20FF, "init")];
//! let kinfo = KernelDescription::new("boot=disk", &areas, &modules);
//!
//! assert_eq!(kinfo.modules().len(), 1);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod boot;
pub mod limits;
pub mod memory;
