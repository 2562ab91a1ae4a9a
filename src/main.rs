#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

mod board;

use traffic_countdown::config::{DISPLAY_INTERVAL_MS, LAMP_INTERVAL_MS};
use traffic_countdown::display::DigitBuffer;
use traffic_countdown::flags::DeferredFlags;
use traffic_countdown::phase::PhaseSnapshot;
use traffic_countdown::tick::Interval;

// Out of range intervals fail the build here.
const DISPLAY_INTERVAL: Interval = Interval::from_millis(DISPLAY_INTERVAL_MS);
const LAMP_INTERVAL: Interval = Interval::from_millis(LAMP_INTERVAL_MS);

// Shared between the tick handlers and idle without locks; each field has a
// single writer.
static FLAGS: DeferredFlags = DeferredFlags::new();
static SNAPSHOT: PhaseSnapshot = PhaseSnapshot::new();
static BUFFER: DigitBuffer = DigitBuffer::new();

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::*;
    use crate::board::{AlarmTick, OutputLine};
    use defmt::{debug, info, trace, unwrap};
    use rp_pico::hal::{
        clocks::init_clocks_and_plls,
        sio::Sio,
        timer::{Alarm0, Alarm1, Timer},
        watchdog::Watchdog,
    };
    use traffic_countdown::buzzer::Buzzer;
    use traffic_countdown::control::{Countdown, DeferredWork, LampTick};
    use traffic_countdown::display::{Multiplexer, SegmentBus, SelectBus};
    use traffic_countdown::lamp::LampDriver;
    use traffic_countdown::tick::PeriodicTimer;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        display_timer: PeriodicTimer<AlarmTick<Alarm0>>,
        countdown: Countdown,
        multiplexer: Multiplexer<OutputLine>,
        lamp_timer: PeriodicTimer<AlarmTick<Alarm1>>,
        aux: LampTick,
        lamps: LampDriver<OutputLine>,
        work: DeferredWork<OutputLine>,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let clocks = unwrap!(init_clocks_and_plls(
            rp_pico::XOSC_CRYSTAL_FREQ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok());

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        // Segments a-g and dp on GP0-GP7.
        let segments = SegmentBus::new([
            pins.gpio0.into_push_pull_output().into_dyn_pin(),
            pins.gpio1.into_push_pull_output().into_dyn_pin(),
            pins.gpio2.into_push_pull_output().into_dyn_pin(),
            pins.gpio3.into_push_pull_output().into_dyn_pin(),
            pins.gpio4.into_push_pull_output().into_dyn_pin(),
            pins.gpio5.into_push_pull_output().into_dyn_pin(),
            pins.gpio6.into_push_pull_output().into_dyn_pin(),
            pins.gpio7.into_push_pull_output().into_dyn_pin(),
        ]);
        // Digit decoder address on GP8-GP10, its enable on GP11.
        let select = SelectBus::new(
            [
                pins.gpio8.into_push_pull_output().into_dyn_pin(),
                pins.gpio9.into_push_pull_output().into_dyn_pin(),
                pins.gpio10.into_push_pull_output().into_dyn_pin(),
            ],
            pins.gpio11.into_push_pull_output().into_dyn_pin(),
        );
        let mut multiplexer = Multiplexer::new(segments, select);

        let lamps = LampDriver::new(
            [
                pins.gpio12.into_push_pull_output().into_dyn_pin(),
                pins.gpio13.into_push_pull_output().into_dyn_pin(),
                pins.gpio14.into_push_pull_output().into_dyn_pin(),
            ],
            pins.gpio15.into_push_pull_output().into_dyn_pin(),
        );

        let mut buzzer = Buzzer::new(pins.gpio16.into_push_pull_output().into_dyn_pin());

        multiplexer.enable();
        buzzer.enable();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let display_timer = unwrap!(PeriodicTimer::configure(
            AlarmTick::new(unwrap!(timer.alarm_0())),
            DISPLAY_INTERVAL,
        ));
        let lamp_timer = unwrap!(PeriodicTimer::configure(
            AlarmTick::new(unwrap!(timer.alarm_1())),
            LAMP_INTERVAL,
        ));

        let countdown = Countdown::new();
        countdown.phase().publish(&SNAPSHOT);

        let work = DeferredWork::new(buzzer);
        work.render(&SNAPSHOT, &BUFFER);
        multiplexer.refresh(&BUFFER);

        info!(
            "~ initialisation ~ display tick {=u32} us, lamp tick {=u32} us",
            display_timer.interval().as_micros(),
            lamp_timer.interval().as_micros()
        );

        (
            Shared {},
            Local {
                display_timer,
                countdown,
                multiplexer,
                lamp_timer,
                aux: LampTick::new(),
                lamps,
                work,
            },
            init::Monotonics(),
        )
    }

    // Tick source A: countdown, then one digit of the display.
    #[task(binds = TIMER_IRQ_0, priority = 1, local = [display_timer, countdown, multiplexer])]
    fn display_refresh(ctx: display_refresh::Context) {
        let countdown = ctx.local.countdown;
        let multiplexer = ctx.local.multiplexer;

        unwrap!(ctx.local.display_timer.on_fire(|| {
            countdown.on_display_tick(&FLAGS, &SNAPSHOT);
            multiplexer.refresh(&BUFFER);
        }));
    }

    // Tick source B: lamps only, independent of the display rate.
    #[task(binds = TIMER_IRQ_1, priority = 1, local = [lamp_timer, aux, lamps])]
    fn lamp_refresh(ctx: lamp_refresh::Context) {
        let aux = ctx.local.aux;
        let lamps = ctx.local.lamps;

        unwrap!(ctx.local.lamp_timer.on_fire(|| {
            aux.on_lamp_tick(&FLAGS);
            lamps.refresh(SNAPSHOT.phase());
        }));
    }

    // The deferred-work loop. Polls, never sleeps.
    #[idle(local = [work])]
    fn idle(ctx: idle::Context) -> ! {
        let work = ctx.local.work;
        let mut shown = SNAPSHOT.phase();
        info!("phase {} from {=i16}s", shown, SNAPSHOT.remaining());

        loop {
            let serviced = work.poll(&FLAGS, &SNAPSHOT, &BUFFER);

            if serviced.display {
                let phase = SNAPSHOT.phase();
                if phase != shown {
                    info!("phase {} from {=i16}s", phase, SNAPSHOT.remaining());
                    shown = phase;
                } else {
                    debug!("{=i16}s left", SNAPSHOT.remaining());
                }
            }
            if serviced.aux {
                trace!("aux tick");
            }
        }
    }
}
