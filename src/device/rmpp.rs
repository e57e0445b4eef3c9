use super::DeviceProfile;

/// reMarkable Paper Pro device profile.
///
/// Architecture: aarch64, so timestamps are two 64-bit fields.
pub const RMPP: DeviceProfile = DeviceProfile {
    name: "reMarkable Paper Pro",

    // 64-bit ARM input_event struct size
    input_event_size: 24,

    pen_device: "/dev/input/event2",
};
