//! # MNIST Data
//!
//! MNIST 手写数字数据集的 IDX 二进制解码与批处理库。
//!
//! 将四个标准 MNIST 文件（训练图像/标签、验证图像/标签）一次性读入内存，
//! 完成像素线性缩放、标签 one-hot 编码，并按固定批大小切分为矩形批次，
//! 供外部训练库直接消费。
//!
//! # 主要组件
//!
//! - [`MnistDataset`]: 解码后的数据集（四组批次集合）
//! - [`transforms`]: 数据变换函数（像素缩放、one-hot、批处理）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use mnist_data::MnistDataset;
//!
//! // 像素缩放到 [0, 1]，批大小 100
//! let dataset = MnistDataset::load("./MNIST", (0.0, 1.0), 100)?;
//!
//! for (images, labels) in dataset.train_images().iter().zip(dataset.train_labels()) {
//!     // images: [100, 784]，labels: [100, 10]
//! }
//! ```

pub mod error;
pub mod mnist;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use error::DataError;
pub use mnist::MnistDataset;
