// ==========================================
// 门店库存调拨系统 - 引擎编排器
// ==========================================
// 用途: 协调 预测 → 候选筛选 → 分派 → 校验装配 → 提交/模拟 的执行顺序
// 红线: 候选筛选与落库阶段的全部存储调用必须经过重试策略
// 红线: 模拟运行绝不触发存储写入
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::candidate::TransferCandidate;
use crate::domain::plan::TransferPlan;
use crate::domain::product::Product;
use crate::engine::assembler::PlanAssembler;
use crate::engine::candidate_selector::CandidateSelector;
use crate::engine::error::EngineError;
use crate::engine::forecast::DemandForecaster;
use crate::engine::insight::{InsightProvider, NoOpInsightProvider, PlanInsight};
use crate::engine::planner::AllocationPlanner;
use crate::store::retry::{RetryError, RetryPolicy};
use crate::store::AllocationStore;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

// ==========================================
// AllocationRunError - 编排器错误
// ==========================================

#[derive(Error, Debug)]
pub enum AllocationRunError {
    #[error("目的门店不可用: {0}")]
    DestinationUnavailable(String),

    #[error(transparent)]
    Storage(#[from] RetryError),

    #[error(transparent)]
    Consistency(#[from] EngineError),
}

// ==========================================
// AllocationRunResult - 运行结果
// ==========================================

#[derive(Debug)]
pub struct AllocationRunResult {
    pub plan: TransferPlan,
    /// 是否已落库（模拟运行恒为 false）
    pub committed: bool,
    /// 建议服务评注（可选，缺席不影响方案）
    pub insight: Option<PlanInsight>,
    /// 运行诊断信息（截断、跳过、缺口等）
    pub diagnostics: Vec<String>,
}

// ==========================================
// AllocationOrchestrator - 引擎编排器
// ==========================================

pub struct AllocationOrchestrator<S>
where
    S: AllocationStore,
{
    store: Arc<S>,
    retry: RetryPolicy,
    forecaster: DemandForecaster,
    selector: CandidateSelector,
    assembler: PlanAssembler,
    insight: Arc<dyn InsightProvider>,
}

impl<S> AllocationOrchestrator<S>
where
    S: AllocationStore,
{
    /// 创建新的编排器实例（默认重试策略、无建议服务）
    pub fn new(store: Arc<S>) -> Self {
        Self::with_parts(
            store,
            RetryPolicy::default_policy(),
            Arc::new(NoOpInsightProvider),
        )
    }

    /// 以显式重试策略与建议服务构造（测试注入用）
    pub fn with_parts(
        store: Arc<S>,
        retry: RetryPolicy,
        insight: Arc<dyn InsightProvider>,
    ) -> Self {
        Self {
            store,
            retry,
            forecaster: DemandForecaster::new(),
            selector: CandidateSelector::new(),
            assembler: PlanAssembler::new(),
            insight,
        }
    }

    /// 执行完整调拨计划流程（单目的门店）
    ///
    /// # 参数
    /// - destination_outlet_id: 目的门店编号（格式已由 API 层校验）
    /// - simulate: 模拟标记
    /// - config: 运行配置
    ///
    /// # 返回
    /// 运行结果（方案 + 提交状态 + 建议 + 诊断）
    pub async fn execute(
        &self,
        destination_outlet_id: &str,
        simulate: bool,
        config: &AllocationConfig,
    ) -> Result<AllocationRunResult, AllocationRunError> {
        info!(
            destination = destination_outlet_id,
            simulate = simulate,
            "开始执行调拨计划流程"
        );
        let mut diagnostics = Vec::new();

        // ==========================================
        // 步骤1: 读取门店与商品参考数据
        // ==========================================
        debug!("步骤1: 读取门店与商品参考数据");

        let outlets = self
            .retry
            .run("fetch_active_outlets", || self.store.fetch_active_outlets())
            .await?;

        if !outlets
            .iter()
            .any(|o| o.outlet_id == destination_outlet_id && o.is_operational())
        {
            return Err(AllocationRunError::DestinationUnavailable(format!(
                "outlet_id={} 不在营业中门店列表",
                destination_outlet_id
            )));
        }

        let products = self
            .retry
            .run("fetch_products", || self.store.fetch_products())
            .await?;
        let product_index: HashMap<String, Product> = products
            .iter()
            .map(|p| (p.product_id.clone(), p.clone()))
            .collect();

        // ==========================================
        // 步骤2: 读取货源门店库存快照
        // ==========================================
        debug!("步骤2: 读取货源门店库存快照");

        let source_ids: Vec<String> = outlets
            .iter()
            .filter(|o| o.is_eligible_source(destination_outlet_id))
            .map(|o| o.outlet_id.clone())
            .collect();

        let inventory = self
            .retry
            .run("fetch_inventory_snapshot", || {
                self.store.fetch_inventory_snapshot(&source_ids)
            })
            .await?;

        info!(
            source_outlets = source_ids.len(),
            inventory_records = inventory.len(),
            "库存快照读取完成"
        );

        // ==========================================
        // 步骤3: 候选筛选
        // ==========================================
        debug!("步骤3: 执行候选筛选");

        let candidates = self.selector.select(
            destination_outlet_id,
            &outlets,
            &products,
            &inventory,
            config,
        );

        info!(candidates_count = candidates.len(), "候选筛选完成");

        // ==========================================
        // 步骤4: 需求预测（仅预测有候选的商品）
        // ==========================================
        debug!("步骤4: 执行需求预测");

        let mut candidate_products: Vec<String> = candidates
            .iter()
            .map(|c| c.product_id.clone())
            .collect();
        candidate_products.sort();
        candidate_products.dedup();

        let window = config.velocity_window_days();
        let mut targets: HashMap<String, i64> = HashMap::new();
        for product_id in &candidate_products {
            let outlet_velocity = self
                .retry
                .run("fetch_outlet_velocity", || {
                    self.store
                        .fetch_outlet_velocity(product_id, destination_outlet_id, window)
                })
                .await?;
            let network_velocity = self
                .retry
                .run("fetch_network_velocity", || {
                    self.store.fetch_network_velocity(product_id, window)
                })
                .await?;

            let (target, reason) = self.forecaster.target_qty(
                outlet_velocity,
                network_velocity,
                config.cover_days,
                config.buffer_pct,
                config.default_floor_qty,
            );
            debug!(product = product_id.as_str(), target = target, reason = reason.as_str(), "单品目标");
            targets.insert(product_id.clone(), target);
        }

        // ==========================================
        // 步骤5: 商品数上限（0 = 不限制）
        // ==========================================
        let candidates = if config.max_products > 0 {
            let mut ranked: Vec<(&String, &i64)> =
                targets.iter().filter(|(_, t)| **t > 0).collect();
            // 目标降序，平局按商品编号升序（保证确定性）
            ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            if ranked.len() > config.max_products {
                let kept: Vec<String> = ranked
                    .iter()
                    .take(config.max_products)
                    .map(|(id, _)| (*id).clone())
                    .collect();
                diagnostics.push(format!(
                    "max_products={} 生效: {} 个商品按目标降序保留，其余 {} 个放弃",
                    config.max_products,
                    kept.len(),
                    ranked.len() - kept.len()
                ));
                targets.retain(|product_id, _| kept.contains(product_id));
                candidates
                    .into_iter()
                    .filter(|c| kept.contains(&c.product_id))
                    .collect::<Vec<TransferCandidate>>()
            } else {
                candidates
            }
        } else {
            candidates
        };

        // ==========================================
        // 步骤6: 分派规划
        // ==========================================
        debug!("步骤6: 执行分派规划");

        let planner = AllocationPlanner::from_config(config);
        let outcome = planner.assign(destination_outlet_id, &targets, &candidates, &product_index);

        info!(
            lines_count = outcome.lines.len(),
            skipped_count = outcome.skipped_candidates.len(),
            "分派规划完成"
        );
        for (candidate, reason) in &outcome.skipped_candidates {
            debug!(
                product = candidate.product_id.as_str(),
                source = candidate.source_outlet_id.as_str(),
                reason = reason.as_str(),
                "候选被跳过"
            );
        }

        // ==========================================
        // 步骤7: 校验与装配
        // ==========================================
        debug!("步骤7: 执行方案校验与装配");

        let plan = self.assembler.assemble(
            destination_outlet_id,
            simulate,
            &outcome,
            &targets,
            &candidates,
            &product_index,
            config,
        )?;

        if !plan.unmet.is_empty() {
            diagnostics.push(format!(
                "{} 个商品目标未完全满足（报告项，不视为失败）",
                plan.unmet.len()
            ));
        }

        // ==========================================
        // 步骤8: 提交或模拟
        // ==========================================
        let committed = if simulate {
            info!(plan_id = plan.plan_id.as_str(), "模拟运行，跳过落库");
            false
        } else {
            self.retry
                .run("persist_plan", || self.store.persist_plan(&plan))
                .await?;
            info!(plan_id = plan.plan_id.as_str(), "方案已落库");
            true
        };

        // ==========================================
        // 步骤9: 建议服务评注（可选，失败忽略）
        // ==========================================
        let insight = match self.insight.annotate(&plan).await {
            Ok(insight) => insight,
            Err(e) => {
                warn!(error = %e, "建议服务评注失败，忽略");
                None
            }
        };

        info!(
            plan_id = plan.plan_id.as_str(),
            products_count = plan.totals.products_count,
            total_quantity = plan.totals.total_quantity,
            source_stores = plan.totals.source_stores,
            committed = committed,
            "调拨计划流程完成"
        );

        Ok(AllocationRunResult {
            plan,
            committed,
            insight,
            diagnostics,
        })
    }
}
