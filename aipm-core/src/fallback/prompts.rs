//! Local code-prompt generator.
//!
//! Derives a tech stack from the document's overview and functional sections,
//! then renders five fixed prompt sections around it.

use crate::model::{CodePromptSection, CodePromptSet, PromptKind, RequirementDocument};
use crate::schema::DEFAULT_ESTIMATED_TIME;

fn prompt(id: &str, title: &str, kind: PromptKind, content: String) -> CodePromptSection {
    CodePromptSection {
        id: id.to_string(),
        title: title.to_string(),
        content,
        kind,
    }
}

/// First-match tech stack detection over the combined overview and
/// functional-requirements text.
pub fn detect_tech_stack(content: &str) -> Vec<String> {
    let stack: &[&str] = if content.contains("插件") || content.contains("浏览器") {
        &["JavaScript", "HTML", "CSS", "Web Extension API"]
    } else if content.contains("网站") || content.contains("平台") {
        &["React", "Next.js", "TypeScript", "Tailwind CSS"]
    } else if content.contains("应用") || content.contains("系统") {
        &["React", "Node.js", "TypeScript", "Express"]
    } else {
        &["React", "TypeScript", "Tailwind CSS"]
    };
    stack.iter().map(|s| s.to_string()).collect()
}

fn system_prompt(tech_stack: &[String]) -> String {
    let expertise = tech_stack
        .iter()
        .map(|tech| format!("- {}", tech))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "你是一位资深的全栈开发工程师，擅长使用现代技术栈开发高质量的应用程序。\n\n\
         **技术专长:**\n{expertise}\n\n\
         **开发原则:**\n\
         - 编写清晰、可维护的代码\n\
         - 遵循最佳实践和设计模式\n\
         - 重视用户体验和性能优化\n\
         - 确保代码的可读性和可扩展性\n\
         - 适当添加注释和文档\n\n\
         **代码风格:**\n\
         - 使用TypeScript进行类型安全\n\
         - 采用函数式编程和组件化设计\n\
         - 遵循ESLint和Prettier规范\n\
         - 使用语义化的命名方式\n\n\
         请根据以下需求，提供完整的、可立即运行的代码实现。"
    )
}

fn project_overview_prompt(requirement: &str) -> String {
    format!(
        "**项目需求:**\n{requirement}\n\n\
         **项目目标:**\n\
         - 实现上述核心功能\n\
         - 提供良好的用户体验\n\
         - 确保代码质量和可维护性\n\
         - 支持后续功能扩展\n\n\
         **关键要求:**\n\
         - 响应式设计，适配多种设备\n\
         - 美观的UI界面\n\
         - 流畅的交互体验\n\
         - 合理的错误处理\n\
         - 基本的性能优化\n\n\
         请基于以上需求，创建一个完整的项目实现。"
    )
}

fn functional_prompt(functional_reqs: &str) -> String {
    format!(
        "**具体功能需求:**\n{functional_reqs}\n\n\
         **实现要求:**\n\
         - 每个功能模块都要完整实现\n\
         - 提供清晰的用户界面\n\
         - 包含必要的交互反馈\n\
         - 添加适当的加载状态\n\
         - 实现基本的错误处理\n\n\
         **用户体验要求:**\n\
         - 操作流程要直观明了\n\
         - 提供操作提示和帮助信息\n\
         - 确保界面响应及时\n\
         - 支持常见的用户操作习惯\n\n\
         请逐一实现以上功能，确保每个功能都能正常工作。"
    )
}

fn technical_prompt(tech_stack: &[String], requirement: &str) -> String {
    let is_plugin = requirement.contains("插件");
    let is_web_app = requirement.contains("网站") || requirement.contains("平台");

    let tech_points = tech_stack
        .iter()
        .map(|tech| format!("- 充分利用{}的特性和最佳实践", tech))
        .collect::<Vec<_>>()
        .join("\n");

    let mut details = format!(
        "**技术实现要求:**\n\n\
         **项目结构:**\n\
         - 使用模块化的代码组织方式\n\
         - 分离业务逻辑和UI组件\n\
         - 创建可复用的工具函数\n\
         - 合理划分文件和目录结构\n\n\
         **技术要点:**\n{tech_points}\n"
    );

    if is_plugin {
        details.push_str(
            "\n\n**浏览器插件特定要求:**\n\
             - 创建完整的manifest.json配置\n\
             - 实现background script和content script\n\
             - 处理跨域请求和权限管理\n\
             - 提供popup界面和options页面\n\
             - 确保在不同网站上的兼容性",
        );
    }

    if is_web_app {
        details.push_str(
            "\n\n**Web应用特定要求:**\n\
             - 实现路由管理和页面导航\n\
             - 添加状态管理（如需要）\n\
             - 实现数据持久化\n\
             - 添加API集成（如需要）\n\
             - 确保SEO友好性",
        );
    }

    details.push_str(
        "\n\n**代码质量:**\n\
         - 添加TypeScript类型定义\n\
         - 实现错误边界和异常处理\n\
         - 添加必要的单元测试\n\
         - 确保代码可读性和文档完整性\n\n\
         请根据以上技术要求实现项目。",
    );

    details
}

fn structure_prompt(tech_stack: &[String]) -> String {
    let is_react_project = tech_stack.iter().any(|t| t == "React" || t == "Next.js");
    let is_plugin = tech_stack.iter().any(|t| t == "Web Extension API");

    if is_plugin {
        return "**浏览器插件项目结构要求:**\n\n\
                请按照以下结构创建项目文件：\n\n\
                ```\n\
                project/\n\
                ├── manifest.json          # 插件配置文件\n\
                ├── popup/\n\
                │   ├── popup.html         # 弹窗页面\n\
                │   ├── popup.js           # 弹窗逻辑\n\
                │   └── popup.css          # 弹窗样式\n\
                ├── content/\n\
                │   ├── content.js         # 内容脚本\n\
                │   └── content.css        # 注入样式\n\
                ├── background/\n\
                │   └── background.js      # 后台脚本\n\
                ├── options/\n\
                │   ├── options.html       # 设置页面\n\
                │   ├── options.js         # 设置逻辑\n\
                │   └── options.css        # 设置样式\n\
                ├── assets/\n\
                │   ├── icons/             # 图标文件\n\
                │   └── images/            # 图片资源\n\
                └── utils/\n\
                    └── common.js          # 通用工具函数\n\
                ```\n\n\
                **文件实现要求:**\n\
                - manifest.json必须包含完整的权限和配置\n\
                - 每个脚本文件都要有清晰的功能分工\n\
                - 样式文件要确保不影响原网页\n\
                - 工具函数要具有良好的复用性"
            .to_string();
    }

    if is_react_project {
        return "**React/Next.js项目结构要求:**\n\n\
                请按照以下结构创建项目文件：\n\n\
                ```\n\
                project/\n\
                ├── src/\n\
                │   ├── components/        # React组件\n\
                │   │   ├── ui/           # 基础UI组件\n\
                │   │   └── features/     # 功能组件\n\
                │   ├── pages/            # 页面组件\n\
                │   ├── hooks/            # 自定义Hook\n\
                │   ├── utils/            # 工具函数\n\
                │   ├── types/            # TypeScript类型\n\
                │   ├── styles/           # 样式文件\n\
                │   └── constants/        # 常量定义\n\
                ├── public/               # 静态资源\n\
                ├── package.json          # 项目配置\n\
                ├── tsconfig.json         # TypeScript配置\n\
                ├── tailwind.config.js    # Tailwind配置\n\
                └── next.config.js        # Next.js配置\n\
                ```\n\n\
                **组件开发要求:**\n\
                - 每个组件都要有明确的职责\n\
                - 使用TypeScript进行类型约束\n\
                - 组件要具有良好的可复用性\n\
                - 添加适当的PropTypes或接口定义"
            .to_string();
    }

    "**通用项目结构要求:**\n\n\
     请创建清晰的项目文件结构，包含：\n\
     - 源代码目录\n\
     - 配置文件\n\
     - 样式资源\n\
     - 工具函数\n\
     - 文档说明\n\n\
     确保每个文件都有明确的用途和良好的组织方式。"
        .to_string()
}

/// Generate the code-prompt set from a requirement document
pub fn generate(document: &RequirementDocument) -> CodePromptSet {
    let overview = document
        .section("overview")
        .map(|section| section.content.as_str())
        .unwrap_or("");
    let functional = document
        .section("functional_requirements")
        .map(|section| section.content.as_str())
        .unwrap_or("");

    let combined = format!("{}{}", overview, functional);
    let tech_stack = detect_tech_stack(&combined);

    CodePromptSet {
        prompts: vec![
            prompt(
                "system_prompt",
                "系统提示词",
                PromptKind::System,
                system_prompt(&tech_stack),
            ),
            prompt(
                "project_overview",
                "项目概述提示词",
                PromptKind::Functional,
                project_overview_prompt(overview),
            ),
            prompt(
                "functional_prompt",
                "功能实现提示词",
                PromptKind::Functional,
                functional_prompt(functional),
            ),
            prompt(
                "technical_prompt",
                "技术实现提示词",
                PromptKind::Technical,
                technical_prompt(&tech_stack, overview),
            ),
            prompt(
                "structure_prompt",
                "项目结构提示词",
                PromptKind::Structure,
                structure_prompt(&tech_stack),
            ),
        ],
        tech_stack,
        estimated_time: DEFAULT_ESTIMATED_TIME.to_string(),
    }
}
