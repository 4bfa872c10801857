/// Supported target boards, in sidebar order. The first entry is the default.
pub const BOARD_TYPES: [&str; 6] = [
    "Arduino UNO",
    "Arduino Mega",
    "Arduino Nano",
    "ESP32",
    "ESP8266",
    "ESP32-S3",
];

/// Project categories, in sidebar order. "Custom Project" is the catch-all.
pub const PROJECT_TYPES: [&str; 16] = [
    "Temperature & Humidity Sensor (DHT11/DHT22)",
    "Motion Detection (PIR Sensor)",
    "Distance Measurement (Ultrasonic)",
    "Light Sensor (LDR)",
    "Soil Moisture Sensor",
    "Gas Detection (MQ-5/MQ-7)",
    "Flame Detection",
    "LCD Display",
    "Servo Motor Control",
    "RFID Reader",
    "GPS Module",
    "Bluetooth Module (HC-05)",
    "WiFi Connectivity",
    "Cloud Integration (ThingSpeak/Firebase)",
    "IoT Data Logging",
    "Custom Project",
];

/// Build the full instruction sent to the model for one request.
///
/// Deterministic: the same (board, project, request) always produces the
/// same string. Callers are expected to pass a trimmed, non-empty request.
pub fn build_prompt(board: &str, project: &str, request: &str) -> String {
    format!(
        "You are an expert embedded systems and IoT programmer specializing in Arduino and ESP board programming.\n\
         \n\
         The user is asking for code to work with: {board}\n\
         Project Category: {project}\n\
         \n\
         When generating code:\n\
         1. Provide complete, working code with all necessary includes and configurations\n\
         2. Add detailed comments explaining each section\n\
         3. Include pin definitions clearly\n\
         4. Add setup() and loop() functions for Arduino-style code\n\
         5. Include any necessary sensor initialization and calibration\n\
         6. Add error handling where appropriate\n\
         7. Provide library recommendations if external libraries are needed\n\
         8. Format code clearly with proper indentation\n\
         9. Include example output or expected behavior\n\
         10. Add troubleshooting tips if relevant\n\
         \n\
         The user asks: {request}"
    )
}
