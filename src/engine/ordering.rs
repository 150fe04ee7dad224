// ==========================================
// 列车物流规划系统 - 序列重排工具
// ==========================================
// 货物编组重排与侧栏列车列表重排共用同一实现
// 约束: 不修改输入, 返回新序列; 其余元素相对顺序不变
// ==========================================

/// 不可变移动: 把 `from` 位置的元素移动到 `to` 位置
///
/// # 语义
/// - `from == to` 返回等值拷贝
/// - `to` 超出尾部时收敛为追加到末尾
/// - `from` 越界时返回未变拷贝 (拖拽索引来自 UI, 宽容处理)
pub fn array_move<T: Clone>(sequence: &[T], from: usize, to: usize) -> Vec<T> {
    let mut result = sequence.to_vec();
    if from >= result.len() || from == to {
        return result;
    }

    let moved = result.remove(from);
    let insert_at = to.min(result.len());
    result.insert(insert_at, moved);
    result
}
