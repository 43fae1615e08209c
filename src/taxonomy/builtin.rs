use super::{Category, Leaf, Subcategory};

fn leaf(key: &str, name: &str, keywords: &[&str]) -> Leaf {
    Leaf {
        key: key.to_string(),
        name: name.to_string(),
        keywords: keywords.iter().map(|kw| kw.to_string()).collect(),
    }
}

fn sub(key: &str, name: &str, leaves: Vec<Leaf>) -> Subcategory {
    Subcategory {
        key: key.to_string(),
        name: name.to_string(),
        leaves,
    }
}

fn category(key: &str, name: &str, subcategories: Vec<Subcategory>) -> Category {
    Category {
        key: key.to_string(),
        name: name.to_string(),
        subcategories,
    }
}

pub(super) fn categories() -> Vec<Category> {
    vec![psychology(), management(), finance()]
}

fn psychology() -> Category {
    category(
        "psychology",
        "心理咨询",
        vec![
            sub(
                "clinical",
                "临床心理",
                vec![
                    leaf("depression", "抑郁障碍", &["抑郁症", "抑郁发作", "重度抑郁", "轻度抑郁", "双相抑郁"]),
                    leaf("anxiety", "焦虑障碍", &["焦虑症", "广泛性焦虑", "惊恐发作", "恐惧症", "强迫症"]),
                    leaf("obsessive_compulsive", "强迫障碍", &["强迫症", "强迫行为", "强迫思维", "OCD"]),
                    leaf("phobia", "恐惧症", &["恐惧症", "社交恐惧", "广场恐惧", "特定恐惧"]),
                    leaf("bipolar", "双相障碍", &["双相情感障碍", "躁郁症", "躁狂发作", "双相"]),
                    leaf("insomnia", "睡眠障碍", &["失眠症", "睡眠障碍", "嗜睡症", "睡眠呼吸暂停"]),
                    leaf("eating_disorder", "进食障碍", &["厌食症", "贪食症", "暴食症", "进食障碍"]),
                    leaf("ptsd", "创伤应激", &["PTSD", "创伤后应激障碍", "急性应激障碍", "创伤"]),
                ],
            ),
            sub(
                "therapy",
                "咨询技术",
                vec![
                    leaf("cbt", "认知行为疗法", &["认知行为疗法", "CBT", "认知重构", "行为激活", "暴露疗法"]),
                    leaf("psychodynamic", "精神分析", &["精神分析", "心理动力学", "移情", "反移情", "自由联想"]),
                    leaf("person_centered", "人本主义", &["人本主义", "当事人中心", "罗杰斯", "无条件积极关注"]),
                    leaf("family_therapy", "家庭治疗", &["家庭治疗", "夫妻治疗", "婚姻治疗", "系统式家庭治疗"]),
                    leaf("art_therapy", "艺术治疗", &["艺术治疗", "音乐治疗", "绘画治疗", "沙盘治疗", "表达性艺术治疗"]),
                    leaf("group_therapy", "团体治疗", &["团体治疗", "小组治疗", "团体辅导", "心理剧"]),
                ],
            ),
            sub(
                "developmental",
                "发展心理",
                vec![
                    leaf("child", "儿童心理", &["儿童心理", "儿童发展", "幼儿心理", "儿童行为问题"]),
                    leaf("adolescent", "青少年心理", &["青少年心理", "青春期", "叛逆期", "青少年问题"]),
                    leaf("adult", "成年心理", &["成年心理", "中年危机", "成年发展"]),
                    leaf("elderly", "老年心理", &["老年心理", "老龄化", "老年抑郁", "认知障碍"]),
                ],
            ),
            sub(
                "relationship",
                "婚恋家庭",
                vec![
                    leaf("marriage", "婚姻咨询", &["婚姻咨询", "夫妻关系", "婚姻危机", "婚姻经营"]),
                    leaf("dating", "恋爱心理", &["恋爱心理", "情感关系", "约会技巧", "亲密关系"]),
                    leaf("family", "家庭关系", &["家庭关系", "亲子关系", "婆媳关系", "家庭沟通"]),
                    leaf("divorce", "离婚心理", &["离婚心理", "离异", "离婚调适", "单亲家庭"]),
                ],
            ),
            sub(
                "workplace",
                "职场心理",
                vec![
                    leaf("career", "职业规划", &["职业规划", "职业发展", "职业选择", "转行"]),
                    leaf("work_stress", "工作压力", &["工作压力", "职业倦怠", "过劳", "压力管理"]),
                    leaf("leadership_psych", "领导力心理", &["领导力心理", "管理心理", "决策心理", "影响力"]),
                    leaf("workplace_conflict", "职场人际", &["职场人际", "同事关系", "职场沟通", "职场霸凌"]),
                ],
            ),
            sub(
                "emotion",
                "情绪管理",
                vec![
                    leaf("emotion_regulation", "情绪调节", &["情绪调节", "情绪管理", "情绪控制", "情商"]),
                    leaf("anger", "愤怒管理", &["愤怒管理", "控制愤怒", "情绪宣泄"]),
                    leaf("stress", "压力管理", &["压力管理", "减压", "应对压力", "心理压力"]),
                    leaf("resilience", "心理韧性", &["心理韧性", "抗逆力", "复原力", "心理资本"]),
                ],
            ),
        ],
    )
}

fn management() -> Category {
    category(
        "management",
        "企业管理",
        vec![
            sub(
                "strategy",
                "战略管理",
                vec![
                    leaf("corporate_strategy", "企业战略", &["企业战略", "公司战略", "战略规划", "战略目标"]),
                    leaf("business_strategy", "业务战略", &["业务战略", "竞争战略", "差异化战略", "成本领先"]),
                    leaf("blue_ocean", "蓝海战略", &["蓝海战略", "价值创新", "红海", "市场创新"]),
                    leaf("strategic_analysis", "战略分析", &["SWOT分析", "PEST分析", "波特五力", "战略分析"]),
                    leaf("strategic_execution", "战略执行", &["战略执行", "战略落地", "战略实施", "执行"]),
                ],
            ),
            sub(
                "hr",
                "人力资源",
                vec![
                    leaf("hr_planning", "人力资源规划", &["人力资源规划", "人力规划", "人才规划", "HR规划"]),
                    leaf("organization", "组织架构", &["组织架构", "组织设计", "组织结构", "扁平化", "矩阵式"]),
                    leaf("position_system", "职位体系", &["职位体系", "岗位体系", "职位描述", "岗位分析", "胜任力模型"]),
                    leaf(
                        "compensation_benefits",
                        "薪酬绩效",
                        &["薪酬管理", "绩效管理", "薪酬体系", "绩效考核", "KPI", "OKR", "股权激励"],
                    ),
                    leaf("talent_management", "人才管理", &["人才管理", "人才发展", "人才盘点", "继任计划", "人才梯队"]),
                    leaf("recruitment", "招聘选拔", &["招聘", "选拔", "面试", "人才引进", "校园招聘", "猎头"]),
                    leaf("training", "培训发展", &["培训", "员工发展", "学习发展", "企业大学", "培训体系"]),
                    leaf("employee_relations", "员工关系", &["员工关系", "劳动关系", "员工满意", "员工敬业度"]),
                ],
            ),
            sub(
                "culture",
                "企业文化",
                vec![
                    leaf("culture_building", "文化建设", &["企业文化建设", "文化落地", "文化塑造", "价值观"]),
                    leaf("culture_transformation", "文化变革", &["文化变革", "文化转型", "组织变革", "变革管理"]),
                    leaf("employer_brand", "雇主品牌", &["雇主品牌", "最佳雇主", "雇主形象", "员工体验"]),
                    leaf("org_behavior", "组织行为", &["组织行为", "行为管理", "员工行为", "组织氛围"]),
                ],
            ),
            sub(
                "operations",
                "运营管理",
                vec![
                    leaf("supply_chain", "供应链管理", &["供应链管理", "供应链", "采购管理", "物流管理", "供应商管理"]),
                    leaf("process_optimization", "流程优化", &["流程优化", "业务流程", "流程再造", "BPR", "精益管理"]),
                    leaf("quality_control", "质量管理", &["质量管理", "质量控制", "六西格玛", "QA", "QC"]),
                    leaf("project_management", "项目管理", &["项目管理", "敏捷开发", "Scrum", "项目控制", "PM"]),
                    leaf("lean_production", "精益生产", &["精益生产", "精益管理", "5S", "TPS", "丰田生产方式"]),
                ],
            ),
            sub(
                "marketing",
                "市场营销",
                vec![
                    leaf("brand_management", "品牌管理", &["品牌管理", "品牌建设", "品牌策略", "品牌定位"]),
                    leaf("digital_marketing", "数字营销", &["数字营销", "网络营销", "新媒体营销", "社交媒体营销"]),
                    leaf("market_research", "市场调研", &["市场调研", "市场研究", "用户调研", "消费者洞察"]),
                    leaf("product_marketing", "产品营销", &["产品营销", "产品策略", "产品定位", "产品生命周期"]),
                    leaf("customer_strategy", "客户策略", &["客户关系", "CRM", "客户运营", "用户增长", "私域流量"]),
                    leaf("sales_management", "销售管理", &["销售管理", "销售技巧", "渠道管理", "销售团队"]),
                ],
            ),
            sub(
                "innovation",
                "创新管理",
                vec![
                    leaf("product_innovation", "产品创新", &["产品创新", "产品研发", "R&D", "研发管理"]),
                    leaf("business_model", "商业模式", &["商业模式", "商业创新", "盈利模式", "平台模式"]),
                    leaf("digital_transformation", "数字化转型", &["数字化转型", "数字化", "信息化", "企业数字化"]),
                    leaf("open_innovation", "开放式创新", &["开放式创新", "协同创新", "生态创新"]),
                ],
            ),
            sub(
                "leadership",
                "领导力发展",
                vec![
                    leaf("executive_leadership", "高管领导力", &["CEO", "高管", "高管团队", "决策层", "董事会"]),
                    leaf("middle_management", "中层管理", &["中层管理", "部门经理", "团队主管", "管理技能"]),
                    leaf("leadership_dev", "领导力发展", &["领导力发展", "领导力培养", "领导梯队", "潜能开发"]),
                    leaf("decision_making", "决策管理", &["决策管理", "决策方法", "科学决策", "数据决策"]),
                ],
            ),
        ],
    )
}

fn finance() -> Category {
    category(
        "finance",
        "财务会计税务",
        vec![
            sub(
                "financial_accounting",
                "财务会计",
                vec![
                    leaf("accounting_standards", "会计准则", &["会计准则", "企业会计准则", "IAS", "IFRS", "GAAP"]),
                    leaf(
                        "financial_statements",
                        "财务报表",
                        &["财务报表", "资产负债表", "利润表", "现金流量表", "所有者权益变动表"],
                    ),
                    leaf("accounting_cycle", "会计核算", &["会计核算", "记账", "凭证", "账簿", "会计分录"]),
                    leaf("accounting_systems", "会计制度", &["会计制度", "财务制度", "内控制度", "会计政策"]),
                ],
            ),
            sub(
                "management_accounting",
                "管理会计",
                vec![
                    leaf("cost_accounting", "成本会计", &["成本会计", "成本核算", "成本控制", "标准成本", "作业成本"]),
                    leaf("budget_management", "预算管理", &["预算管理", "全面预算", "预算编制", "预算执行", "预算考核"]),
                    leaf(
                        "performance_measurement",
                        "绩效管理",
                        &["绩效管理", "绩效评价", "KPI", "平衡计分卡", "责任会计"],
                    ),
                    leaf("internal_control", "内部控制", &["内部控制", "风险管理", "COSO", "风险控制", "合规管理"]),
                ],
            ),
            sub(
                "tax",
                "税务",
                vec![
                    leaf("vat", "增值税", &["增值税", "进项税", "销项税", "增值税专用发票", "小规模纳税人"]),
                    leaf("corporate_tax", "企业所得税", &["企业所得税", "企业税收", "汇算清缴", "应纳税所得额"]),
                    leaf("personal_tax", "个人所得税", &["个人所得税", "个税", "专项扣除", "工资薪金"]),
                    leaf("tax_planning", "税务筹划", &["税务筹划", "税收筹划", "节税", "合理避税"]),
                    leaf("tax_compliance", "税务申报", &["税务申报", "报税", "纳税申报", "电子税务局"]),
                    leaf(
                        "other_taxes",
                        "其他税种",
                        &["印花税", "城建税", "教育费附加", "土地增值税", "房产税", "契税"],
                    ),
                ],
            ),
            sub(
                "audit",
                "审计",
                vec![
                    leaf("external_audit", "外部审计", &["外部审计", "年报审计", "审计报告", "审计意见"]),
                    leaf("internal_audit", "内部审计", &["内部审计", "内审", "审计部门", "审计程序"]),
                    leaf("audit_standards", "审计准则", &["审计准则", "审计标准", "ISA", "审计规范"]),
                ],
            ),
            sub(
                "financial_management",
                "财务管理",
                vec![
                    leaf("financial_analysis", "财务分析", &["财务分析", "财务比率", "杜邦分析", "财务指标", "盈利能力"]),
                    leaf("investment_decision", "投资决策", &["投资决策", "资本预算", "NPV", "IRR", "投资回报"]),
                    leaf("financing", "融资管理", &["融资", "股权融资", "债权融资", "IPO", "私募融资"]),
                    leaf("working_capital", "营运资金", &["营运资金", "流动资金", "现金流管理", "资金管理"]),
                    leaf("cfo_role", "财务总监", &["CFO", "财务总监", "首席财务官", "财务高管"]),
                ],
            ),
            sub(
                "financial_report",
                "财务报告",
                vec![
                    leaf("report_disclosure", "信息披露", &["信息披露", "定期报告", "临时公告", "证监会"]),
                    leaf("consolidated_statements", "合并报表", &["合并报表", "合并财务报表", "母公司", "子公司"]),
                    leaf("segment_reporting", "分部报告", &["分部报告", "业务分部", "地区分部"]),
                ],
            ),
        ],
    )
}
