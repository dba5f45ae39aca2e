/*
Module: mappers

Dispatcher module for bank-switching mappers beyond NROM (which lives in
`crate::mapper` next to the trait). Concrete implementations live in their
own files.

Implemented:
- UxROM (Mapper 2)
*/

pub mod uxrom;

pub use uxrom::Uxrom;
