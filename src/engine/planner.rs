// ==========================================
// 列车物流规划系统 - 规划编排器
// ==========================================
// 职责: 列车生命周期 + 活动指针 + 工作集编辑的统一入口
// 数据流: 表单 → 校验 → 计算引擎派生车厢数 → 工作集 →
//         保存为命名列车 → 仓储持久化
// 红线: freightCars 只经计算引擎产出; 保存失败向上传播
// ==========================================

use crate::domain::id::{generate_item_id, generate_train_id};
use crate::domain::item::{Item, ItemFormData, WorkingSet};
use crate::domain::train::Train;
use crate::engine::calculator::{calculate_cars, total_freight_cars, CalcError};
use crate::engine::ordering::array_move;
use crate::engine::validator::{parse_item_form, validate_train_name, FormErrors, TrainNameError};
use crate::repository::error::RepositoryError;
use crate::repository::store::KeyValueStore;
use crate::repository::train_repo::TrainRepository;
use thiserror::Error;
use tracing::debug;

// ==========================================
// PlannerError - 编排器错误
// ==========================================

/// 规划编排器错误
#[derive(Error, Debug)]
pub enum PlannerError {
    // 用户可修正: 按字段报告, 不越过表单边界
    #[error("表单校验未通过")]
    InvalidForm(FormErrors),

    #[error(transparent)]
    InvalidTrainName(#[from] TrainNameError),

    #[error("列车未找到: {0}")]
    TrainNotFound(String),

    #[error("货物未找到: {0}")]
    ItemNotFound(String),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

pub type PlannerResult<T> = Result<T, PlannerError>;

// ==========================================
// TrainPlanner - 规划编排器
// ==========================================

/// 规划编排器
///
/// 持有已载入的列车集合、活动列车指针与当前工作集;
/// UI 边界只与此类型和校验/计算入口交互
pub struct TrainPlanner<S: KeyValueStore> {
    repo: TrainRepository<S>,
    trains: Vec<Train>,
    active_train_id: Option<String>,
    working: WorkingSet,
}

impl<S: KeyValueStore> TrainPlanner<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: TrainRepository::new(store),
            trains: Vec::new(),
            active_train_id: None,
            working: WorkingSet::new(),
        }
    }

    /// 启动初始化: 一次性旧数据迁移 → 载入集合 → 恢复活动列车
    ///
    /// 持久化的指针指向已不存在的列车时回退到首辆列车;
    /// 集合为空时保持空工作集
    pub fn init(&mut self) -> PlannerResult<()> {
        self.repo.migrate_legacy_items_to_trains()?;
        self.trains = self.repo.load_trains()?;

        let saved_id = self
            .repo
            .get_active_train_id()
            .filter(|id| self.trains.iter().any(|t| &t.id == id));

        let activate = saved_id.or_else(|| self.trains.first().map(|t| t.id.clone()));
        if let Some(id) = activate {
            if let Some(train) = self.trains.iter().find(|t| t.id == id) {
                self.working.load(train.items.clone());
            }
            self.set_active(Some(&id));
        }
        Ok(())
    }

    // ===== 只读访问 =====

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn active_train_id(&self) -> Option<&str> {
        self.active_train_id.as_deref()
    }

    /// 当前工作集货物 (活动列车的编辑态或未保存的新编组)
    pub fn active_items(&self) -> &[Item] {
        self.working.items()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.working.has_unsaved_changes()
    }

    /// 活动列车名称 (工作集未归属任何列车时为 None)
    pub fn current_train_name(&self) -> Option<&str> {
        let id = self.active_train_id.as_deref()?;
        self.trains
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }

    /// 全列车厢数合计 (可视化用)
    pub fn total_freight_cars(&self) -> u32 {
        total_freight_cars(self.working.items())
    }

    // ===== 列车操作 =====

    /// 把当前工作集保存为命名列车
    ///
    /// - train_id 为 None: 新建列车 (新标识符, created/updated 取当前时刻)
    /// - train_id 命中现有列车: 覆盖其名称与货物, 刷新 updated_at
    ///
    /// 名称重复 (不区分大小写, 重命名排除自身) 被拒绝;
    /// 持久化失败向上传播, 未保存标志保持置位
    pub fn save_current_train(
        &mut self,
        name: &str,
        train_id: Option<&str>,
    ) -> PlannerResult<String> {
        let trimmed = validate_train_name(name, &self.trains, train_id)?;
        let items = self.working.items().to_vec();

        // 先在副本上变更, 持久化成功后才提交到内存态
        let mut next = self.trains.clone();
        let saved_id = match train_id {
            Some(id) => {
                let train = next
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or_else(|| PlannerError::TrainNotFound(id.to_string()))?;
                train.name = trimmed;
                train.set_items(items);
                id.to_string()
            }
            None => {
                let train = Train::new(generate_train_id(), trimmed, items);
                let id = train.id.clone();
                next.push(train);
                id
            }
        };

        self.repo.save_trains(&next)?;
        self.trains = next;
        self.set_active(Some(&saved_id));
        self.working.mark_saved();
        debug!(train_id = %saved_id, "列车已保存");
        Ok(saved_id)
    }

    /// 切换到指定列车 (载入其货物, 丢弃工作集中的未保存变更)
    pub fn load_train(&mut self, id: &str) -> PlannerResult<()> {
        let train = self
            .trains
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| PlannerError::TrainNotFound(id.to_string()))?;
        self.working.load(train.items.clone());
        let id = id.to_string();
        self.set_active(Some(&id));
        Ok(())
    }

    /// 开始一列全新的未保存编组 (清空工作集与活动指针)
    pub fn create_new_train(&mut self) {
        self.working.clear();
        self.set_active(None);
    }

    /// 重命名列车并持久化
    pub fn rename_train(&mut self, id: &str, new_name: &str) -> PlannerResult<()> {
        let trimmed = validate_train_name(new_name, &self.trains, Some(id))?;
        let mut next = self.trains.clone();
        let train = next
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| PlannerError::TrainNotFound(id.to_string()))?;
        train.rename(trimmed);
        self.repo.save_trains(&next)?;
        self.trains = next;
        Ok(())
    }

    /// 删除列车并持久化
    ///
    /// 删除的是活动列车时: 切换到剩余的首辆列车并载入其货物;
    /// 集合被删空则回退为空的未保存工作集
    pub fn delete_train(&mut self, id: &str) -> PlannerResult<()> {
        if !self.trains.iter().any(|t| t.id == id) {
            return Err(PlannerError::TrainNotFound(id.to_string()));
        }

        let next: Vec<Train> = self.trains.iter().filter(|t| t.id != id).cloned().collect();
        self.repo.save_trains(&next)?;
        self.trains = next;

        if self.active_train_id.as_deref() == Some(id) {
            match self.trains.first() {
                Some(next) => {
                    self.working.load(next.items.clone());
                    let next_id = next.id.clone();
                    self.set_active(Some(&next_id));
                }
                None => self.create_new_train(),
            }
        }
        Ok(())
    }

    /// 重排侧栏列车列表并持久化
    pub fn reorder_trains(&mut self, from: usize, to: usize) -> PlannerResult<()> {
        let next = array_move(&self.trains, from, to);
        self.repo.save_trains(&next)?;
        self.trains = next;
        Ok(())
    }

    // ===== 工作集货物操作 =====

    /// 从表单新增货物 (校验 → 派生车厢数 → 入工作集)
    pub fn add_item(&mut self, form: &ItemFormData) -> PlannerResult<Item> {
        let item = self.build_item(generate_item_id(), form)?;
        self.working.push(item.clone());
        Ok(item)
    }

    /// 按标识符更新货物 (标识符不可变, 其余字段重建并重算车厢数)
    pub fn update_item(&mut self, id: &str, form: &ItemFormData) -> PlannerResult<Item> {
        if self.working.get(id).is_none() {
            return Err(PlannerError::ItemNotFound(id.to_string()));
        }
        let item = self.build_item(id.to_string(), form)?;
        self.working.replace(id, item.clone());
        Ok(item)
    }

    /// 删除货物, 返回是否命中
    pub fn delete_item(&mut self, id: &str) -> bool {
        self.working.remove(id)
    }

    /// 查找货物
    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.working.get(id)
    }

    /// 重排工作集货物
    pub fn reorder_items(&mut self, from: usize, to: usize) {
        let reordered = array_move(self.working.items(), from, to);
        self.working.set_order(reordered);
    }

    // ===== 内部 =====

    fn build_item(&self, id: String, form: &ItemFormData) -> PlannerResult<Item> {
        let parsed = parse_item_form(form).map_err(PlannerError::InvalidForm)?;
        let freight_cars = calculate_cars(
            parsed.car_type,
            parsed.required_parts,
            Some(parsed.stack_size),
            Some(parsed.belt_tier),
        )?;

        Ok(Item {
            id,
            name: parsed.name,
            car_type: parsed.car_type,
            loop_time: parsed.loop_time,
            required_parts: parsed.required_parts,
            stack_size: parsed.stack_size,
            belt_tier: parsed.belt_tier,
            image_data: parsed.image_data,
            freight_cars,
        })
    }

    fn set_active(&mut self, id: Option<&str>) {
        self.active_train_id = id.map(str::to_string);
        self.repo.set_active_train_id(id);
    }
}
