use super::DeviceProfile;

pub const RM2: DeviceProfile = DeviceProfile {
    name: "reMarkable 2",

    // 32-bit ARM input_event struct size
    input_event_size: 16,

    // event1 = pen, event2 = touch
    pen_device: "/dev/input/event1",
};
