mod contact_dto;

pub use contact_dto::{
    NotificationFlagsDto, NotificationSettingsResponseDto, UpdateNotificationSettingsDto,
};
