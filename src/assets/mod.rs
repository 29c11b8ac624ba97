/// Sprite sheet decoding (image source collaborator).
pub mod decode;
