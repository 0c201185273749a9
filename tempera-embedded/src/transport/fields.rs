use core::fmt;

/// GATT service a field is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    /// User Data service
    Sensor,
    /// Alert Notification service
    Workmode,
}

impl ServiceKind {
    pub fn uuid(&self) -> u16 {
        match self {
            ServiceKind::Sensor => 0x181C,
            ServiceKind::Workmode => 0x1811,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    ReadWrite,
}

/// Transport-facing fields of the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    DeviceInfo,
    Temperature,
    Humidity,
    AirQuality,
    LightIntensity,
    DataReadAck,
    Workmode,
    ModeReadAck,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::DeviceInfo,
        Field::Temperature,
        Field::Humidity,
        Field::AirQuality,
        Field::LightIntensity,
        Field::DataReadAck,
        Field::Workmode,
        Field::ModeReadAck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::DeviceInfo => "deviceInfo",
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::AirQuality => "airQuality",
            Field::LightIntensity => "lightIntensity",
            Field::DataReadAck => "dataReadAck",
            Field::Workmode => "workmode",
            Field::ModeReadAck => "modeReadAck",
        }
    }

    /// 16-bit characteristic UUID. Both ack flags share `0x2A7D` and are told
    /// apart by their service.
    pub fn uuid(&self) -> u16 {
        match self {
            Field::DeviceInfo => 0x2A00,
            Field::Temperature => 0x2A6E,
            Field::Humidity => 0x0544,
            Field::AirQuality => 0x0542,
            Field::LightIntensity => 0x054B,
            Field::DataReadAck => 0x2A7D,
            Field::Workmode => 0x2BDE,
            Field::ModeReadAck => 0x2A7D,
        }
    }

    pub fn service(&self) -> ServiceKind {
        match self {
            Field::Workmode | Field::ModeReadAck => ServiceKind::Workmode,
            _ => ServiceKind::Sensor,
        }
    }

    /// User description descriptor.
    pub fn description(&self) -> &'static str {
        match self {
            Field::DeviceInfo => "Device Name",
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::AirQuality => "air_quality",
            Field::LightIntensity => "light_intensity",
            Field::DataReadAck => "dataGotReadVariable",
            Field::Workmode => "workmode",
            Field::ModeReadAck => "readDataDescriptor",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Field::DataReadAck | Field::ModeReadAck => Access::ReadWrite,
            _ => Access::Read,
        }
    }

    /// Maximum text length for string fields.
    pub fn capacity(&self) -> usize {
        match self {
            Field::Workmode => 16,
            Field::DataReadAck | Field::ModeReadAck => 1,
            _ => 64,
        }
    }

    pub fn lookup(service: ServiceKind, uuid: u16) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.service() == service && field.uuid() == uuid)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value written into a field: text for readings, a byte flag for acks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
}
