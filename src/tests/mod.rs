//! 单元测试
