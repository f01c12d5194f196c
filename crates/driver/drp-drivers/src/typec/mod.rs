//! USB Type-C port controllers.
//!
//! Drivers here detect cable attachment and orientation and steer the
//! port's data role; the role switch and port framework they report to are
//! provided by the platform through [`drp_driver_api::PlatformServices`].

pub mod pi5usb30213a;
