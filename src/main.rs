#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod stub {
    use core::panic::PanicInfo;

    use nitroboot::arch::arm::trampoline;
    use nitroboot::boot::{Handshake, LocalState};
    use nitroboot::config::BootConfig;
    use nitroboot::drivers::ipc::IpcSync;
    use nitroboot::drivers::mmio::Mmio;
    use nitroboot::drivers::tty::console::{MapConsole, NullConsole, SUB_TEXT_MAP};
    use nitroboot::drivers::tty::Console;
    use nitroboot::{halt, logger, println};

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        println!("{}", info);
        halt()
    }

    /// Rust entry point called from boot.s
    #[unsafe(no_mangle)]
    pub extern "C" fn _start_rust() -> ! {
        // SAFETY: we are the ARM9 boot stub, running with the boot memory map.
        let bus = unsafe { Mmio::new() };
        let config = BootConfig::load(&bus);

        // SAFETY: first thing after entry, single core, IRQs masked by boot.s.
        if unsafe { logger::init(logger::default_level(config.debug)) }.is_err() {
            println!("logger already installed");
        }
        log::info!("nitroboot: debug console {}", if config.debug { "on" } else { "off" });

        if config.debug {
            boot(bus, MapConsole::new(bus, SUB_TEXT_MAP), &config)
        } else {
            boot(bus, NullConsole, &config)
        }
    }

    fn boot<C: Console>(bus: Mmio, console: C, config: &BootConfig) -> ! {
        let mut handshake = Handshake::new(bus, IpcSync::new(bus), console, config);

        match handshake.run() {
            LocalState::Run => match trampoline::prepare(&bus) {
                Ok(entry) => {
                    log::info!("entering guest at {:#010x}", entry);
                    nitroboot::drivers::tty::WRITER.lock().disable();
                    // SAFETY: the handshake reached Run, so the companion has
                    // loaded the guest and the reset sequencer has finished.
                    unsafe { trampoline::enter_guest(entry) }
                }
                Err(err) => {
                    log::error!("{}", err);
                    halt()
                }
            },
            state => {
                log::error!("boot halted in {:?}", state);
                halt()
            }
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("nitroboot only runs on the ARM9; build for armv5te-none-eabi");
}
