use rustybeacon::hci::{
    encode_reset, encode_set_advertising_data, encode_set_advertising_enable,
    encode_set_advertising_params,
};
use rustybeacon::{BeaconConfig, HciSocket};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Open HCI socket for device 0
    let socket = match HciSocket::open(0) {
        Ok(socket) => socket,
        Err(e) => {
            eprintln!("Failed to open HCI socket: {}", e);
            eprintln!("This might be because:");
            eprintln!("1. No Bluetooth adapter is available");
            eprintln!("2. The Bluetooth adapter is not powered on");
            eprintln!("3. You don't have sufficient permissions to access the Bluetooth device");
            return Err(e.into());
        }
    };

    let config = BeaconConfig::default();

    socket.send_packet(&encode_reset())?;
    println!("Reset controller");

    socket.send_packet(&encode_set_advertising_params(&config.params))?;
    println!("Set advertising parameters");

    let payload = config.advertising_payload()?;
    socket.send_packet(&encode_set_advertising_data(
        payload.as_bytes(),
        payload.len() as u8,
    ))?;
    println!("Set advertising data: {}", config.beacon.uuid);

    socket.send_packet(&encode_set_advertising_enable(true))?;
    println!("Started advertising");

    // Wait for user input to stop advertising
    println!("Press Enter to stop advertising...");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    socket.send_packet(&encode_set_advertising_enable(false))?;
    println!("Stopped advertising");

    Ok(())
}
