/*!
Controller abstraction for serial input via $4016/$4017.

Behavior:
- The host supplies the live button state as a `Buttons` byte. Bit order is
  the order the CPU reads them, most significant first:
  A, B, Select, Start, Up, Down, Left, Right  (bit 7 through bit 0)
- A CPU write sets the strobe line from bit 0 and snapshots the live state
  into the shift register. While strobe is high the register keeps reloading,
  so every read returns A. Games write 1 then 0 to latch.
- With strobe low each CPU read returns bit 7 of the shift register (as bit 0
  of the result) and shifts the register left by one. After 8 reads the
  register is empty and further reads return 0 until the next snapshot.

No polling happens here; the Bus forwards port writes to `write` and port
reads to `read`.
*/

use bitflags::bitflags;

bitflags! {
    /// Button mask in serial read order (A is read first).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const A      = 0x80;
        const B      = 0x40;
        const SELECT = 0x20;
        const START  = 0x10;
        const UP     = 0x08;
        const DOWN   = 0x04;
        const LEFT   = 0x02;
        const RIGHT  = 0x01;
    }
}

#[derive(Clone, Debug, Default)]
pub struct Controller {
    // Live state supplied by the host.
    buttons: Buttons,
    // Snapshot being shifted out, MSB first.
    shift: u8,
    strobe: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live button state.
    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.buttons = buttons;
    }

    pub fn set_button(&mut self, button: Buttons, pressed: bool) {
        self.buttons.set(button, pressed);
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// CPU write to the port: drive strobe from bit 0 and snapshot the live
    /// state.
    pub fn write(&mut self, value: u8) {
        self.strobe = value & 0x01 != 0;
        self.shift = self.buttons.bits();
    }

    /// CPU read from the port: next serialized bit.
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            self.shift = self.buttons.bits();
        }
        let bit = (self.shift & 0x80) >> 7;
        self.shift <<= 1;
        bit
    }

    /// Remaining shift register contents (for debugging).
    pub fn shift_register(&self) -> u8 {
        self.shift
    }
}
