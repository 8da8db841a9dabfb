//! Wire and domain models shared by the API service and the upload client.

pub mod upload;

pub use upload::{
    AttachmentRef, ErrorResponse, FileMeta, InquiryRequest, InquiryResponse, PresignedUrlRequest,
    PresignedUrlResponse, UploadResponse,
};
