#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use embassy_executor::Spawner;
use embassy_time::Delay;
use esp_hal::{
    Async, Config,
    clock::CpuClock,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    rmt::Rmt,
    time::Rate,
    timer::systimer::SystemTimer,
};
use panic_rtt_target as _;
use static_cell::StaticCell;
use traffic_light_rtos::{
    MODE,
    drivers::{MatrixStream, Oled, RomLoader, SystemClock},
    hal::Buzzer,
    tasks::{
        audio_cue, color_indicator, display, indicator::Indicator, matrix_animator, mode_switch,
        update_button,
    },
};

/// Our LED matrix stream, owned by the matrix task
static MATRIX_STREAM: StaticCell<MatrixStream> = StaticCell::new();

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

type RgbIndicator = Indicator<Output<'static>, Output<'static>, Output<'static>>;

#[embassy_executor::task]
async fn mode_switch_task(mut button: Input<'static>) {
    mode_switch(&MODE, &mut button, &SystemClock, &mut Delay).await
}

#[embassy_executor::task]
async fn indicator_task(mut indicator: RgbIndicator) {
    color_indicator(&MODE, &mut indicator, &mut Delay).await
}

#[embassy_executor::task]
async fn audio_task(mut buzzer: Buzzer<Output<'static>>) {
    audio_cue(&MODE, &mut buzzer, &mut Delay).await
}

#[embassy_executor::task]
async fn matrix_task(stream: &'static mut MatrixStream) {
    matrix_animator(&MODE, stream, &mut Delay).await
}

#[embassy_executor::task]
async fn display_task(mut oled: Oled) {
    display(&MODE, &mut oled, &mut Delay).await
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    rtt_target::rtt_init_defmt!();
    #[cfg(not(feature = "defmt"))]
    rtt_target::rtt_init_print!();

    let peripherals = esp_hal::init(Config::default().with_cpu_clock(CpuClock::max()));
    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    let button_config = InputConfig::default().with_pull(Pull::Up);
    let mode_button = Input::new(peripherals.GPIO9, button_config);
    let mut update = Input::new(peripherals.GPIO3, button_config);

    let indicator = Indicator::new(
        Output::new(peripherals.GPIO4, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO0, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO1, Level::Low, OutputConfig::default()),
    );
    let buzzer = Buzzer::new(Output::new(
        peripherals.GPIO10,
        Level::Low,
        OutputConfig::default(),
    ));

    let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(80))
        .expect("Failed to initialise RMT0")
        .into_async();
    let stream = MATRIX_STREAM.init(MatrixStream::new(rmt, peripherals.GPIO2));

    let i2c: I2c<'static, Async> = I2c::new(peripherals.I2C0, I2cConfig::default())
        .expect("Failed to initialise I2C0")
        .with_scl(peripherals.GPIO6)
        .with_sda(peripherals.GPIO5)
        .into_async();
    let oled = Oled::new(i2c)
        .await
        .expect("Display couldn't be initialised");

    spawner
        .spawn(mode_switch_task(mode_button))
        .expect("Failed to spawn mode switch task");
    spawner
        .spawn(indicator_task(indicator))
        .expect("Failed to spawn indicator task");
    spawner
        .spawn(audio_task(buzzer))
        .expect("Failed to spawn audio task");
    spawner
        .spawn(matrix_task(stream))
        .expect("Failed to spawn matrix task");
    spawner
        .spawn(display_task(oled))
        .expect("Failed to spawn display task");

    #[cfg(feature = "defmt")]
    defmt::info!("MAIN: Controller running, watching the update button");
    update_button(&mut update, &mut RomLoader, &mut Delay).await
}
