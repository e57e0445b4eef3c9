use super::DeviceProfile;

pub const RM1: DeviceProfile = DeviceProfile {
    name: "reMarkable 1",

    // 32-bit ARM input_event struct size
    input_event_size: 16,

    // event0 = wacom digitizer, event1 = touch, event2 = buttons
    pen_device: "/dev/input/event0",
};
