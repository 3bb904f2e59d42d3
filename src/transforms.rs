//! 数据变换函数
//!
//! 提供图像提取与标签提取共用的预处理操作：像素线性缩放、
//! one-hot 编码和固定批大小的批处理。

use ndarray::Array2;

use crate::error::DataError;

/// 将 0-255 像素值线性缩放到 [min, max]
///
/// 缩放公式：`(max - min) * x / 255 + min`，
/// 因此字节 0 精确映射到 `min`，字节 255 精确映射到 `max`。
///
/// # 参数
/// - `bytes`: 原始像素字节
/// - `(min, max)`: 目标范围，选择取决于下游网络的激活函数
///
/// # 返回
/// 缩放后的像素序列，顺序与输入一致
pub fn scale_pixels(bytes: &[u8], (min, max): (f32, f32)) -> Vec<f32> {
    bytes
        .iter()
        .map(|&x| (max - min) * f32::from(x) / 255.0 + min)
        .collect()
}

/// 将类别字节转换为 one-hot 编码
///
/// # 参数
/// - `labels`: 原始标签字节，每个值应在 `0..num_classes` 内
/// - `num_classes`: 类别总数
///
/// # 返回
/// 每个标签一行长度为 `num_classes` 的编码，1 的位置等于标签值
///
/// # 错误
/// 某个标签字节 >= `num_classes` 时返回 `FormatError`（显式越界检查，
/// 不做不检查的查表索引）
///
/// # 示例
/// ```ignore
/// let encoded = one_hot_labels(&[0, 2, 1], 3)?;
/// // 结果: [[1,0,0], [0,0,1], [0,1,0]]
/// ```
pub fn one_hot_labels(labels: &[u8], num_classes: usize) -> Result<Vec<Vec<f32>>, DataError> {
    labels
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let class_idx = y as usize;
            if class_idx >= num_classes {
                return Err(DataError::FormatError(format!(
                    "标签越界: 第 {} 个标签为 {} (期望 0-{})",
                    i,
                    y,
                    num_classes - 1
                )));
            }
            let mut row = vec![0.0; num_classes];
            row[class_idx] = 1.0;
            Ok(row)
        })
        .collect()
}

/// 将记录序列按固定批大小切分为矩形批次
///
/// 批次数量为 `records.len() / batch_size`（向下取整），每个批次依源顺序
/// 取连续 `batch_size` 条记录。末尾不足一个批次的记录被静默丢弃，
/// 不做填充或结转——下游训练库依赖所有批次严格矩形。
///
/// # 参数
/// - `records`: 记录序列，每条长度必须为 `record_len`
/// - `batch_size`: 批大小，必须大于 0
/// - `record_len`: 单条记录的长度（图像 784，标签 10）
///
/// # 返回
/// 批次序列，每个批次形状为 `[batch_size, record_len]`
pub fn create_batches(
    records: Vec<Vec<f32>>,
    batch_size: usize,
    record_len: usize,
) -> Vec<Array2<f32>> {
    assert!(batch_size > 0, "create_batches: batch_size 必须大于 0");

    let num_batches = records.len() / batch_size;

    (0..num_batches)
        .map(|batch_idx| {
            let start = batch_idx * batch_size;
            let mut data = Vec::with_capacity(batch_size * record_len);
            for record in &records[start..start + batch_size] {
                assert_eq!(
                    record.len(),
                    record_len,
                    "create_batches: 记录长度不一致，期望 {}，实际 {}",
                    record_len,
                    record.len()
                );
                data.extend_from_slice(record);
            }
            Array2::from_shape_vec((batch_size, record_len), data)
                .expect("create_batches: 批次数据长度与形状不一致")
        })
        .collect()
}
