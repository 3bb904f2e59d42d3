//! MNIST 手写数字数据集解码器
//!
//! 支持：
//! - IDX 二进制格式解析（支持 .gz 压缩）
//! - 像素线性缩放到调用方指定的 [min, max]
//! - 标签 one-hot 编码（显式越界检查）
//! - 按固定批大小切分为矩形批次（末尾余数静默丢弃）

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use ndarray::Array2;

use crate::error::DataError;
use crate::transforms::{create_batches, one_hot_labels, scale_pixels};

/// MNIST 数据目录下的四个固定文件名
const TRAIN_IMAGES_FILE: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS_FILE: &str = "train-labels-idx1-ubyte";
const VALIDATION_IMAGES_FILE: &str = "t10k-images-idx3-ubyte";
const VALIDATION_LABELS_FILE: &str = "t10k-labels-idx1-ubyte";

/// IDX3 图像文件头部长度（magic、数量、行数、列数，各 4 字节）
const IMAGE_HEADER_LEN: usize = 16;
/// IDX1 标签文件头部长度（magic、数量，各 4 字节）
const LABEL_HEADER_LEN: usize = 8;
/// 单张图像的像素数（28x28，按行展平）
const IMAGE_SIZE: usize = 784;
/// 类别数（数字 0-9）
const NUM_CLASSES: usize = 10;

/// MNIST 手写数字数据集
///
/// 在构造时一次性读取并变换四个源文件，此后不再变动；
/// 四组批次集合中，训练图像与训练标签的批次数和每批记录数一致，
/// 验证集同理，批次 `i` 的图像与标签逐条对应。
#[derive(Debug, Clone)]
pub struct MnistDataset {
    /// 训练图像批次，每批 [batch_size, 784]
    train_images: Vec<Array2<f32>>,
    /// 训练标签批次，每批 [batch_size, 10] (one-hot)
    train_labels: Vec<Array2<f32>>,
    /// 验证图像批次，每批 [batch_size, 784]
    validation_images: Vec<Array2<f32>>,
    /// 验证标签批次，每批 [batch_size, 10] (one-hot)
    validation_labels: Vec<Array2<f32>>,
    /// 批大小
    batch_size: usize,
}

impl MnistDataset {
    /// 加载并解码完整数据集
    ///
    /// # 参数
    /// - `root`: 包含四个标准 MNIST 文件的数据目录
    /// - `pixel_range`: 像素缩放目标范围 `(min, max)`，要求 `min < max`；
    ///   常用 `(0, 1)` 或 `(-1, 1)`，取决于下游网络的激活函数
    /// - `batch_size`: 批大小，必须大于 0
    ///
    /// # 返回
    /// 解码后的 `MnistDataset`；任一文件缺失或不可读、格式非法时整体失败，
    /// 不返回部分数据集
    ///
    /// # 错误
    /// - `ConfigError`: `batch_size == 0` 或 `min >= max`（在任何 IO 之前检查）
    /// - `FileNotFound` / `IoError`: 文件缺失或读取失败
    /// - `FormatError`: 文件短于头部、标签越界、图像/标签数量不一致
    pub fn load(
        root: impl AsRef<Path>,
        pixel_range: (f32, f32),
        batch_size: usize,
    ) -> Result<Self, DataError> {
        // 配置检查先于一切文件 IO
        if batch_size == 0 {
            return Err(DataError::ConfigError(
                "batch_size 必须大于 0".to_string(),
            ));
        }
        let (min, max) = pixel_range;
        if !(min < max) {
            return Err(DataError::ConfigError(format!(
                "无效的像素范围: ({}, {}) (要求 min < max)",
                min, max
            )));
        }

        let data_dir = root.as_ref();

        // 四个文件依次完整读入并变换
        let train_images = extract_images(data_dir, TRAIN_IMAGES_FILE, pixel_range)?;
        let train_labels = extract_labels(data_dir, TRAIN_LABELS_FILE)?;
        let validation_images = extract_images(data_dir, VALIDATION_IMAGES_FILE, pixel_range)?;
        let validation_labels = extract_labels(data_dir, VALIDATION_LABELS_FILE)?;

        // 同一划分内图像与标签数量必须一致，否则批次无法逐条对应
        check_split_counts("训练集", train_images.len(), train_labels.len())?;
        check_split_counts(
            "验证集",
            validation_images.len(),
            validation_labels.len(),
        )?;

        // 图像与标签用同一批处理策略，保证批次索引对应关系
        Ok(Self {
            train_images: create_batches(train_images, batch_size, IMAGE_SIZE),
            train_labels: create_batches(train_labels, batch_size, NUM_CLASSES),
            validation_images: create_batches(validation_images, batch_size, IMAGE_SIZE),
            validation_labels: create_batches(validation_labels, batch_size, NUM_CLASSES),
            batch_size,
        })
    }

    /// 训练图像批次
    pub fn train_images(&self) -> &[Array2<f32>] {
        &self.train_images
    }

    /// 训练标签批次
    pub fn train_labels(&self) -> &[Array2<f32>] {
        &self.train_labels
    }

    /// 验证图像批次
    pub fn validation_images(&self) -> &[Array2<f32>] {
        &self.validation_images
    }

    /// 验证标签批次
    pub fn validation_labels(&self) -> &[Array2<f32>] {
        &self.validation_labels
    }

    /// 批大小
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 训练集批次数量
    pub fn num_train_batches(&self) -> usize {
        self.train_images.len()
    }

    /// 验证集批次数量
    pub fn num_validation_batches(&self) -> usize {
        self.validation_images.len()
    }
}

/// 检查同一划分内图像与标签的记录数量是否一致
fn check_split_counts(split: &str, num_images: usize, num_labels: usize) -> Result<(), DataError> {
    if num_images != num_labels {
        return Err(DataError::FormatError(format!(
            "{}图像与标签数量不一致: {} vs {}",
            split, num_images, num_labels
        )));
    }
    Ok(())
}

/// 定位数据文件，找不到未压缩文件时回退到同名 .gz
fn resolve_file(data_dir: &Path, base_name: &str) -> Result<PathBuf, DataError> {
    // 优先检查解压后的文件
    let uncompressed_path = data_dir.join(base_name);
    if uncompressed_path.exists() {
        return Ok(uncompressed_path);
    }

    // 检查 .gz 文件
    let gz_path = data_dir.join(format!("{}.gz", base_name));
    if gz_path.exists() {
        return Ok(gz_path);
    }

    Err(DataError::FileNotFound(uncompressed_path))
}

/// 将文件完整读入内存，.gz 后缀的文件透明解压
fn read_file(path: &Path) -> Result<Vec<u8>, DataError> {
    let file = File::open(path).map_err(|_| DataError::FileNotFound(path.to_path_buf()))?;
    let mut reader: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// 从图像文件提取缩放后的图像记录
///
/// 丢弃 16 字节头部后，把剩余字节逐一缩放到目标范围，再按 784 个像素
/// 一张切分为图像记录。头部字段（magic、数量、行列数）不做解析，
/// 声明尺寸与 784 像素假设之间的偏差不在此检查；末尾不足 784 字节的
/// 残缺记录被丢弃。
fn extract_images(
    data_dir: &Path,
    base_name: &str,
    range: (f32, f32),
) -> Result<Vec<Vec<f32>>, DataError> {
    let path = resolve_file(data_dir, base_name)?;
    let bytes = read_file(&path)?;

    if bytes.len() < IMAGE_HEADER_LEN {
        return Err(DataError::FormatError(format!(
            "图像文件 {:?} 过短: {} 字节 (头部需要 {} 字节)",
            path,
            bytes.len(),
            IMAGE_HEADER_LEN
        )));
    }

    let pixels = scale_pixels(&bytes[IMAGE_HEADER_LEN..], range);
    Ok(pixels
        .chunks_exact(IMAGE_SIZE)
        .map(|chunk| chunk.to_vec())
        .collect())
}

/// 从标签文件提取 one-hot 编码的标签记录
///
/// 丢弃 8 字节头部后，把剩余的每个字节（期望 0-9）编码为长度 10 的
/// one-hot 记录；越界字节返回格式错误。
fn extract_labels(data_dir: &Path, base_name: &str) -> Result<Vec<Vec<f32>>, DataError> {
    let path = resolve_file(data_dir, base_name)?;
    let bytes = read_file(&path)?;

    if bytes.len() < LABEL_HEADER_LEN {
        return Err(DataError::FormatError(format!(
            "标签文件 {:?} 过短: {} 字节 (头部需要 {} 字节)",
            path,
            bytes.len(),
            LABEL_HEADER_LEN
        )));
    }

    one_hot_labels(&bytes[LABEL_HEADER_LEN..], NUM_CLASSES)
}
