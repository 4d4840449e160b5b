mod user_dto;

pub use user_dto::{LoginDto, LoginResponseDto, RegisterUserDto, UserCreatedDto, UserSummaryDto};
